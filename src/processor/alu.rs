use num_integer::Integer;

use super::Fault;
use crate::Word;

/// Micro-operations the ALU can latch.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AluOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

/// Two operand latches, an operation selector, a result latch and the zero
/// flag. Add/sub/mul wrap in the word domain; div/rem use floor semantics
/// (quotient toward negative infinity, remainder with the sign of the
/// divisor).
pub struct Alu {
    op1: Word,
    op2: Word,
    opcode: AluOp,
    result: Word,
    zf: bool,
}

impl Alu {
    pub fn new() -> Alu {
        Alu {
            op1: 0,
            op2: 0,
            opcode: AluOp::Add,
            result: 0,
            zf: false,
        }
    }

    /// Loads the operand latches and fires the operation synchronously.
    pub fn latch(&mut self, op1: Word, op2: Word, opcode: AluOp) -> Result<(), Fault> {
        self.op1 = op1;
        self.op2 = op2;
        self.opcode = opcode;
        self.execute()
    }

    fn execute(&mut self) -> Result<(), Fault> {
        let result = match self.opcode {
            AluOp::Add => self.op1.wrapping_add(self.op2),
            AluOp::Sub => self.op1.wrapping_sub(self.op2),
            AluOp::Mul => self.op1.wrapping_mul(self.op2),
            AluOp::Div => {
                if self.op2 == 0 {
                    return Err(Fault::DivisionByZero);
                }
                // Word::MIN / -1 would overflow the word domain.
                if self.op2 == -1 {
                    self.op1.wrapping_neg()
                } else {
                    self.op1.div_floor(&self.op2)
                }
            }
            AluOp::Rem => {
                if self.op2 == 0 {
                    return Err(Fault::DivisionByZero);
                }
                if self.op2 == -1 {
                    0
                } else {
                    self.op1.mod_floor(&self.op2)
                }
            }
        };
        self.result = result;
        self.zf = result == 0;
        Ok(())
    }

    pub fn result(&self) -> Word {
        self.result
    }

    pub fn zf(&self) -> bool {
        self.zf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(op1: Word, op2: Word, opcode: AluOp) -> Result<Word, Fault> {
        let mut alu = Alu::new();
        alu.latch(op1, op2, opcode)?;
        Ok(alu.result())
    }

    #[test]
    fn floor_division() {
        assert_eq!(run(7, 2, AluOp::Div).unwrap(), 3);
        assert_eq!(run(-7, 2, AluOp::Div).unwrap(), -4);
        assert_eq!(run(7, -2, AluOp::Div).unwrap(), -4);
        assert_eq!(run(-7, -2, AluOp::Div).unwrap(), 3);
    }

    #[test]
    fn remainder_takes_the_divisor_sign() {
        assert_eq!(run(7, 3, AluOp::Rem).unwrap(), 1);
        assert_eq!(run(-7, 3, AluOp::Rem).unwrap(), 2);
        assert_eq!(run(7, -3, AluOp::Rem).unwrap(), -2);
        assert_eq!(run(-7, -3, AluOp::Rem).unwrap(), -1);
    }

    #[test]
    fn zero_divisor_faults() {
        assert_eq!(run(1, 0, AluOp::Div), Err(Fault::DivisionByZero));
        assert_eq!(run(1, 0, AluOp::Rem), Err(Fault::DivisionByZero));
    }

    #[test]
    fn minimum_word_by_minus_one() {
        assert_eq!(run(Word::min_value(), -1, AluOp::Div).unwrap(), Word::min_value());
        assert_eq!(run(Word::min_value(), -1, AluOp::Rem).unwrap(), 0);
    }

    #[test]
    fn zero_flag_follows_the_result() {
        let mut alu = Alu::new();
        alu.latch(2, 2, AluOp::Sub).unwrap();
        assert!(alu.zf());
        alu.latch(3, 2, AluOp::Sub).unwrap();
        assert!(!alu.zf());
    }

    #[test]
    fn wrapping_addition() {
        assert_eq!(run(Word::max_value(), 1, AluOp::Add).unwrap(), Word::min_value());
    }
}
