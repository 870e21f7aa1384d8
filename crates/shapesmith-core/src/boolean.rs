//! Boolean combination of resolved shapes
//!
//! A fold is strictly left to right over the operand list:
//! `((a op b) op c) op ...`. Subtract therefore means "first operand minus
//! all the rest", and union/intersect results are reproducible because the
//! kernel always sees operands in list order.

use crate::descriptor::ShapeKind;
use crate::error::{BuildError, Result};
use crate::kernel::GeometryKernel;
use std::fmt;
use tracing::trace;

/// Binary set operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOp {
    Union,
    Subtract,
    Intersect,
}

impl BooleanOp {
    pub const ALL: [BooleanOp; 3] = [Self::Union, Self::Subtract, Self::Intersect];

    /// The descriptor kind naming this operation
    pub fn kind(self) -> ShapeKind {
        match self {
            Self::Union => ShapeKind::Union,
            Self::Subtract => ShapeKind::Subtract,
            Self::Intersect => ShapeKind::Intersect,
        }
    }
}

impl fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind().tag())
    }
}

/// Fold `operands` left to right with `op`
///
/// One operand is returned as is, with no kernel call. Degenerate steps
/// (a disjoint intersect, say) are not errors; the kernel's possibly empty
/// result is passed on.
pub fn fold<K: GeometryKernel>(
    kernel: &K,
    op: BooleanOp,
    operands: &[K::Shape],
) -> Result<K::Shape> {
    let (first, rest) = operands
        .split_first()
        .ok_or(BuildError::EmptyOperandList)?;

    rest.iter()
        .enumerate()
        .try_fold(first.clone(), |acc, (i, operand)| {
            trace!(%op, step = i + 1, "folding operand");
            Ok(kernel.combine(op, &acc, operand)?)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::trace::TraceKernel;

    fn leaves(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn folds_left_associatively() {
        let kernel = TraceKernel::new();
        let result = fold(&kernel, BooleanOp::Subtract, &leaves(&["A", "B", "C"])).unwrap();
        assert_eq!(result, "subtract(subtract(A, B), C)");
    }

    #[test]
    fn single_operand_is_identity() {
        let kernel = TraceKernel::new();
        for op in BooleanOp::ALL {
            let result = fold(&kernel, op, &leaves(&["A"])).unwrap();
            assert_eq!(result, "A");
        }
        assert!(kernel.calls().is_empty());
    }

    #[test]
    fn empty_operands_fail_for_every_op() {
        let kernel = TraceKernel::new();
        for op in BooleanOp::ALL {
            assert_eq!(fold(&kernel, op, &[]).unwrap_err(), BuildError::EmptyOperandList);
        }
    }

    #[test]
    fn kernel_failure_aborts_the_fold() {
        let kernel = TraceKernel::new().failing_on("B");
        let err = fold(&kernel, BooleanOp::Union, &leaves(&["A", "B", "C"])).unwrap_err();
        assert!(matches!(err, BuildError::Kernel(_)));
        assert_eq!(kernel.calls().len(), 1);
    }

    #[test]
    fn op_names_match_tags() {
        assert_eq!(BooleanOp::Union.to_string(), "union");
        assert_eq!(BooleanOp::Subtract.kind(), ShapeKind::Subtract);
        assert_eq!(ShapeKind::Intersect.boolean_op(), Some(BooleanOp::Intersect));
    }
}
