#![deny(missing_docs)]
//! Interface crate to unify how the hashing work of a Merkle operation is
//! passed back to the caller.

pub mod context;

use std::ops::{Add, AddAssign};

pub use context::{CostContext, CostResult, CostsExt};

/// Hashing work performed by an operation.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct OperationCost {
    /// How many times raw chunk bytes were hashed into a leaf digest.
    pub hash_byte_calls: u32,
    /// How many times two digests were combined into a parent digest.
    pub hash_node_calls: u32,
}

impl OperationCost {
    /// Returns `true` if no hashing was recorded.
    pub fn is_nothing(&self) -> bool {
        self.hash_byte_calls == 0 && self.hash_node_calls == 0
    }

    /// Record `count` leaf hashes. Counters stop at `u32::MAX`.
    pub fn add_hash_byte_calls(&mut self, count: usize) {
        self.hash_byte_calls = self.hash_byte_calls.saturating_add(saturate(count));
    }

    /// Record `count` pair hashes. Counters stop at `u32::MAX`.
    pub fn add_hash_node_calls(&mut self, count: usize) {
        self.hash_node_calls = self.hash_node_calls.saturating_add(saturate(count));
    }
}

fn saturate(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

impl Add for OperationCost {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        OperationCost {
            hash_byte_calls: self.hash_byte_calls.saturating_add(rhs.hash_byte_calls),
            hash_node_calls: self.hash_node_calls.saturating_add(rhs.hash_node_calls),
        }
    }
}

impl AddAssign for OperationCost {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Macro to achieve a kind of what `?` operator does, but with `CostContext` on
/// top. Main properties are:
/// 1. Early termination on error;
/// 2. Because of 1. `Result` is removed from the equation;
/// 3. `CostContext` is removed too because it is added to external cost
///    accumulator;
/// 4. Early termination uses external cost accumulator so previous
///    costs won't be lost.
#[macro_export]
macro_rules! cost_return_on_error {
    ( &mut $cost:ident, $($body:tt)+ ) => {
        {
            use $crate::CostsExt;
            let result_with_cost = { $($body)+ };
            let result = result_with_cost.unwrap_add_cost(&mut $cost);
            match result {
                Ok(x) => x,
                Err(e) => return Err(e).wrap_with_cost($cost),
            }
        }
    };
}

/// Same as `cost_return_on_error` but for a plain `Result`: no cost is added
/// except what was accumulated before the call.
#[macro_export]
macro_rules! cost_return_on_error_no_add {
    ( &$cost:ident, $($body:tt)+ ) => {
        {
            use $crate::CostsExt;
            let result = { $($body)+ };
            match result {
                Ok(x) => x,
                Err(e) => return Err(e).wrap_with_cost($cost),
            }
        }
    };
}
