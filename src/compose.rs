//! Right-to-left function composition.
//!
//! The building block the middleware applier uses to collapse a chain of
//! dispatch wrappers into a single function.

/// A boxed unary transformation, the unit of composition.
pub type ComposeFn<T> = Box<dyn Fn(T) -> T>;

/// Compose functions right to left.
///
/// `compose(vec![f, g, h])` yields a function applying `h` first, then `g`,
/// then `f`. No functions yields the identity; a single function is
/// returned unchanged.
///
/// ```
/// use canister::{compose, ComposeFn};
///
/// let add_one: ComposeFn<i64> = Box::new(|n| n + 1);
/// let double: ComposeFn<i64> = Box::new(|n| n * 2);
///
/// // double runs first, add_one second
/// let pipeline = compose(vec![add_one, double]);
/// assert_eq!(pipeline(5), 11);
/// ```
pub fn compose<T: 'static>(mut funcs: Vec<ComposeFn<T>>) -> ComposeFn<T> {
    match funcs.len() {
        0 => Box::new(|value| value),
        1 => funcs.remove(0),
        _ => Box::new(move |value| funcs.iter().rev().fold(value, |acc, f| f(acc))),
    }
}
