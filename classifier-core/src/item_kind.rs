//! The coarse item type the fallback classifier and decision engine key on.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Product,
    Service,
    Unknown,
}
