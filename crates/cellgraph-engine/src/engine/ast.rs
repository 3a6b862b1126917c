//! Formula expression tree.
//!
//! [`Expr`] is what the parser produces and what [`super::Formula`] walks.
//! Printing an `Expr` yields canonical formula text: operators without
//! surrounding spaces and only the parentheses needed to rebuild the very
//! same tree when the text is parsed again.

use std::fmt;

use super::format::format_number;
use super::position::Position;
use super::value::CellError;

/// Binary operators, in the order the parser knows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    fn symbol(self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
            BinaryOperator::Divide => '/',
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Add | BinaryOperator::Subtract => 1,
            BinaryOperator::Multiply | BinaryOperator::Divide => 2,
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Negate,
}

impl UnaryOperator {
    fn symbol(self) -> char {
        match self {
            UnaryOperator::Plus => '+',
            UnaryOperator::Negate => '-',
        }
    }
}

const UNARY_PRECEDENCE: u8 = 3;
const ATOM_PRECEDENCE: u8 = 4;

/// Formula expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal
    Number(f64),
    /// Single cell reference (may point outside the grid)
    Reference(Position),
    Unary {
        op: UnaryOperator,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Number(_) | Expr::Reference(_) => ATOM_PRECEDENCE,
            Expr::Unary { .. } => UNARY_PRECEDENCE,
            Expr::Binary { op, .. } => op.precedence(),
        }
    }

    /// Evaluate the tree, calling `resolver` for every in-bounds reference.
    ///
    /// The first error met anywhere in the tree becomes the result.
    pub fn evaluate(
        &self,
        resolver: &mut dyn FnMut(Position) -> Result<f64, CellError>,
    ) -> Result<f64, CellError> {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::Reference(pos) => {
                if !pos.is_valid() {
                    return Err(CellError::Ref);
                }
                resolver(*pos)
            }
            Expr::Unary { op, operand } => {
                let value = operand.evaluate(resolver)?;
                Ok(match op {
                    UnaryOperator::Plus => value,
                    UnaryOperator::Negate => -value,
                })
            }
            Expr::Binary { op, left, right } => {
                let lhs = left.evaluate(resolver)?;
                let rhs = right.evaluate(resolver)?;
                let result = match op {
                    BinaryOperator::Add => lhs + rhs,
                    BinaryOperator::Subtract => lhs - rhs,
                    BinaryOperator::Multiply => lhs * rhs,
                    BinaryOperator::Divide => {
                        if rhs == 0.0 {
                            return Err(CellError::Div0);
                        }
                        lhs / rhs
                    }
                };
                if result.is_finite() {
                    Ok(result)
                } else {
                    Err(CellError::Div0)
                }
            }
        }
    }

    /// Append every reference leaf to `out`, left to right, duplicates included.
    pub fn collect_references(&self, out: &mut Vec<Position>) {
        match self {
            Expr::Number(_) => {}
            Expr::Reference(pos) => out.push(*pos),
            Expr::Unary { operand, .. } => operand.collect_references(out),
            Expr::Binary { left, right, .. } => {
                left.collect_references(out);
                right.collect_references(out);
            }
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, parenthesize: bool) -> fmt::Result {
    if parenthesize {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => f.write_str(&format_number(*n)),
            Expr::Reference(pos) => write!(f, "{}", pos),
            Expr::Unary { op, operand } => {
                write!(f, "{}", op.symbol())?;
                write_operand(f, operand, operand.precedence() < UNARY_PRECEDENCE)
            }
            Expr::Binary { op, left, right } => {
                let prec = op.precedence();
                write_operand(f, left, left.precedence() < prec)?;
                write!(f, "{}", op.symbol())?;
                // Operators are left-associative; a right operand at the same
                // level keeps its parentheses so the tree shape survives.
                write_operand(f, right, right.precedence() <= prec)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Box<Expr> {
        Box::new(Expr::Number(n))
    }

    fn bin(op: BinaryOperator, left: Box<Expr>, right: Box<Expr>) -> Box<Expr> {
        Box::new(Expr::Binary { op, left, right })
    }

    #[test]
    fn test_print_minimal_parentheses() {
        let expr = bin(
            BinaryOperator::Multiply,
            bin(BinaryOperator::Add, num(1.0), num(2.0)),
            num(3.0),
        );
        assert_eq!(expr.to_string(), "(1+2)*3");

        let expr = bin(
            BinaryOperator::Add,
            num(1.0),
            bin(BinaryOperator::Multiply, num(2.0), num(3.0)),
        );
        assert_eq!(expr.to_string(), "1+2*3");
    }

    #[test]
    fn test_print_keeps_right_grouping() {
        let expr = bin(
            BinaryOperator::Subtract,
            num(1.0),
            bin(BinaryOperator::Subtract, num(2.0), num(3.0)),
        );
        assert_eq!(expr.to_string(), "1-(2-3)");

        let expr = bin(
            BinaryOperator::Subtract,
            bin(BinaryOperator::Subtract, num(1.0), num(2.0)),
            num(3.0),
        );
        assert_eq!(expr.to_string(), "1-2-3");
    }

    #[test]
    fn test_print_unary() {
        let expr = Expr::Unary {
            op: UnaryOperator::Negate,
            operand: bin(BinaryOperator::Add, num(1.0), num(2.0)),
        };
        assert_eq!(expr.to_string(), "-(1+2)");

        let expr = Expr::Unary {
            op: UnaryOperator::Negate,
            operand: Box::new(Expr::Reference(Position::new(0, 0))),
        };
        assert_eq!(expr.to_string(), "-A1");
    }

    #[test]
    fn test_division_by_zero_detected_at_node() {
        let expr = bin(BinaryOperator::Divide, num(1.0), num(0.0));
        let mut resolver = |_: Position| -> Result<f64, CellError> { unreachable!() };
        assert_eq!(expr.evaluate(&mut resolver), Err(CellError::Div0));
    }

    #[test]
    fn test_overflow_is_div0() {
        let expr = bin(BinaryOperator::Multiply, num(1e200), num(1e200));
        let mut resolver = |_: Position| -> Result<f64, CellError> { unreachable!() };
        assert_eq!(expr.evaluate(&mut resolver), Err(CellError::Div0));
    }

    #[test]
    fn test_invalid_reference_skips_resolver() {
        let expr = Expr::Reference(Position::new(20000, 0));
        let mut calls = 0;
        let mut resolver = |_: Position| -> Result<f64, CellError> {
            calls += 1;
            Ok(1.0)
        };
        assert_eq!(expr.evaluate(&mut resolver), Err(CellError::Ref));
        assert_eq!(calls, 0);
    }
}
