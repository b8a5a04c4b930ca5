use matches::debug_assert_matches;
use pest::error::{Error as PestError, ErrorVariant};
use pest::iterators::Pair;
use pest::{Parser, Span};
use pest_derive::Parser;

use simcpu::isa::{InstrKind, Instruction, Opcode, Register};

use crate::error::AsmError;

#[derive(Parser)]
#[grammar = "grammar.pest"]
struct AsmParser;

/// An instruction as parsed. Jump and branch targets are labels until the
/// assembler resolves them to PC-relative immediates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AsmInstruction {
    Complete(Instruction),
    Jump {
        opcode: Opcode,
        label: String,
    },
    Branch {
        opcode: Opcode,
        rs1: Register,
        rs2: Register,
        label: String,
    },
}

/// A label (with its trailing colon, as written) and the instructions
/// grouped under it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenGroup {
    pub label: String,
    pub instructions: Vec<AsmInstruction>,
}

fn new_parser_error(span: Span, message: String) -> AsmError {
    AsmError::from(PestError::new_from_span(
        ErrorVariant::<Rule>::CustomError { message },
        span,
    ))
}

fn shape_error(span: Span, opcode: Opcode) -> AsmError {
    new_parser_error(span, format!("wrong operands for `{}`", opcode))
}

/// Scans the source into label groups. Every instruction must sit under
/// some label.
pub fn tokenize(source: &str) -> Result<Vec<TokenGroup>, AsmError> {
    let program = AsmParser::parse(Rule::program, source)?.next().unwrap();

    let mut tokens: Vec<TokenGroup> = Vec::new();
    for pair in program.into_inner() {
        match pair.as_rule() {
            Rule::label => tokens.push(TokenGroup {
                label: pair.as_str().to_owned(),
                instructions: Vec::new(),
            }),
            Rule::instruction => {
                let instr = process_instruction(pair)?;
                match tokens.last_mut() {
                    Some(group) => group.instructions.push(instr),
                    None => return Err(AsmError::OrphanInstruction),
                }
            }
            Rule::EOI => {}
            _ => unreachable!(),
        }
    }
    Ok(tokens)
}

fn process_instruction(pair: Pair<Rule>) -> Result<AsmInstruction, AsmError> {
    debug_assert_matches!(pair.as_rule(), Rule::instruction);
    let span = pair.as_span();
    let mut pairs = pair.into_inner();
    let opcode: Opcode = pairs.next().unwrap().as_str().parse().unwrap();

    let instr = match pairs.next() {
        None => {
            if opcode.kind() != InstrKind::F {
                return Err(shape_error(span, opcode));
            }
            AsmInstruction::Complete(Instruction::Plain { opcode })
        }
        Some(operands) => match operands.as_rule() {
            Rule::target => {
                if opcode.kind() != InstrKind::D {
                    return Err(shape_error(span, opcode));
                }
                AsmInstruction::Jump {
                    opcode,
                    label: operands.as_str().to_owned(),
                }
            }
            Rule::reg_list => {
                let mut inner = operands.into_inner();
                let first: Register = inner.next().unwrap().as_str().parse().unwrap();
                let second: Register = inner.next().unwrap().as_str().parse().unwrap();

                match inner.next() {
                    None => {
                        if opcode.kind() != InstrKind::C {
                            return Err(shape_error(span, opcode));
                        }
                        AsmInstruction::Complete(Instruction::RegReg {
                            opcode,
                            rd: first,
                            rs: second,
                        })
                    }
                    Some(third) => match third.as_rule() {
                        Rule::reg => {
                            if opcode.kind() != InstrKind::A {
                                return Err(shape_error(span, opcode));
                            }
                            AsmInstruction::Complete(Instruction::ThreeReg {
                                opcode,
                                rd: first,
                                rs1: second,
                                rs2: third.as_str().parse().unwrap(),
                            })
                        }
                        Rule::word => match opcode.kind() {
                            InstrKind::E => AsmInstruction::Branch {
                                opcode,
                                rs1: first,
                                rs2: second,
                                label: third.as_str().to_owned(),
                            },
                            InstrKind::B => AsmInstruction::Complete(Instruction::RegRegImm {
                                opcode,
                                rd: first,
                                rs: second,
                                imm: process_imm(&third)?,
                            }),
                            _ => return Err(shape_error(span, opcode)),
                        },
                        _ => unreachable!(),
                    },
                }
            }
            _ => unreachable!(),
        },
    };
    Ok(instr)
}

fn process_imm(pair: &Pair<Rule>) -> Result<i64, AsmError> {
    let span = pair.as_span();
    let text = pair.as_str();
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(new_parser_error(
            span,
            format!("expected a decimal immediate, found `{}`", text),
        ));
    }
    text.parse::<i64>()
        .map_err(|err| new_parser_error(span, format!("Parsing integer failed: {}", err)))
}
