//! Rewrite conditional chains into dispatch constructs
//!
//! Each chain goes through:
//! - `flatten`: nested `if`/`elseif`/`else` → ordered branch list
//! - `resolve`: conditions → shared discriminant + one key per branch
//! - `switch` or `matching`: branch list → dispatch construct
//!
//! `rewrite` drives the switch variant over a whole tree. The match variant
//! is single-shot and only looks at the first conditional.

mod flatten;
mod matching;
mod resolve;
mod rewrite;
mod switch;

pub use flatten::{Branch, ConditionalChain, DefaultBranch, flatten_chain};
pub use matching::build_match;
pub use resolve::{Condition, Discriminant, EqualityOp, LogicalOp, Resolution, resolve, textualize};
pub use rewrite::rewrite;
pub use switch::{SwitchOptions, build_switch};
