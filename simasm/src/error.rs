use pest::error::Error as PestError;
use thiserror::Error;

use crate::parser::Rule;

#[derive(Error, Debug)]
pub enum AsmError {
    #[error("{0}")]
    Parse(Box<PestError<Rule>>),
    #[error("instruction appears before any label")]
    OrphanInstruction,
    #[error("reference to undefined label `{0}`")]
    UndefinedLabel(String),
    #[error("program has no _start label")]
    MissingStart,
}

impl From<PestError<Rule>> for AsmError {
    fn from(err: PestError<Rule>) -> AsmError {
        AsmError::Parse(Box::new(err))
    }
}
