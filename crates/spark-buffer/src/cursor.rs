/// 读游标：当前读位置与最近一次标记位置，均相对于窗口下界。
///
/// 游标读缓冲与读写缓冲共用该结构；上界约束由持有者在移动前校验。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderCursor {
    index: usize,
    mark: usize,
}

impl ReaderCursor {
    /// 位于 0、标记也位于 0 的游标。
    pub const fn new() -> Self {
        Self { index: 0, mark: 0 }
    }

    /// 当前读位置。
    pub const fn index(&self) -> usize {
        self.index
    }

    /// 最近一次标记位置；从未标记时为 0。
    pub const fn marked(&self) -> usize {
        self.mark
    }

    pub(crate) fn set(&mut self, index: usize) {
        self.index = index;
    }

    pub(crate) fn advance(&mut self, by: usize) {
        self.index += by;
    }

    pub(crate) fn mark(&mut self) {
        self.mark = self.index;
    }

    pub(crate) fn reset(&mut self) {
        self.index = self.mark;
    }

    /// 写上界回退时把读位置与标记一并拉回，不允许“已读”超过“已写”。
    pub(crate) fn clamp(&mut self, limit: usize) {
        self.index = self.index.min(limit);
        self.mark = self.mark.min(limit);
    }
}
