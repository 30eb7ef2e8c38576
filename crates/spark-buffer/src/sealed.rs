//! 封闭缓冲能力 trait 的实现者集合。
//!
//! [`Buffer`](crate::Buffer) 及其子 trait 的默认方法依赖实现者维护窗口与游标不变式
//! （例如 `view_range` 不做校验、`storage_mut` 覆盖整个窗口）。外部类型无法实现 `Sealed`，
//! 因而无法实现这些 trait；本 crate 可以在次版本中为它们追加默认方法而不构成破坏性变更。
pub(crate) trait Sealed {}
