#[macro_use]
extern crate clap;

use clap::Arg;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Debug)]
enum IOErrorContext {
    ReadSource,
    WriteTarget,
}

#[derive(Debug)]
enum Error {
    Asm(simasm::AsmError),
    Obj(simobj::ObjError),
    Io(std::io::Error, IOErrorContext, PathBuf),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err, context, path) => writeln!(
                f,
                "{} file \"{}\" failed: {}",
                match context {
                    IOErrorContext::ReadSource => "Reading source",
                    IOErrorContext::WriteTarget => "Writing target",
                },
                path.display(),
                err
            ),
            Error::Asm(err) => {
                writeln!(f, "Translation failed:")?;
                write!(f, "{}", err)
            }
            Error::Obj(err) => {
                writeln!(f, "Writing the program object failed:")?;
                write!(f, "{}", err)
            }
        }
    }
}

fn main() {
    let matches = app_from_crate!()
        .arg(
            Arg::with_name("SOURCE")
                .help("Sets the assembly source file to read")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("TARGET")
                .help("Sets the program object file to write")
                .required(true)
                .index(2),
        )
        .get_matches();

    let source = matches.value_of("SOURCE").unwrap();
    let target = matches.value_of("TARGET").unwrap();

    if let Err(err) = translate_file(source, target) {
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn translate_file(source: &str, target: &str) -> Result<(), Error> {
    let source_path = Path::new(source);

    let source_file = File::open(source_path)
        .map_err(|err| Error::Io(err, IOErrorContext::ReadSource, source_path.to_owned()))?;
    let mut buf_reader = BufReader::new(source_file);
    let mut input = String::new();

    buf_reader
        .read_to_string(&mut input)
        .map_err(|err| Error::Io(err, IOErrorContext::ReadSource, source_path.to_owned()))?;

    let program = simasm::translate(&input).map_err(Error::Asm)?;

    simobj::write_file(Path::new(target), &program).map_err(Error::Obj)
}
