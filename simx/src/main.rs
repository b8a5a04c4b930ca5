#[macro_use]
extern crate clap;

use clap::Arg;
use std::process;

fn main() {
    env_logger::init();

    let matches = app_from_crate!()
        .arg(
            Arg::with_name("PROGRAM")
                .help("Sets the program object file to run")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("INPUT")
                .help("Sets the interrupt schedule file to use")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("assembly")
                .short("a")
                .long("assembly")
                .help("Treats PROGRAM as assembly source and translates it first"),
        )
        .arg(
            Arg::with_name("memory")
                .short("m")
                .long("memory")
                .takes_value(true)
                .value_name("MEMORY")
                .default_value("100")
                .required(false)
                .help("Sets the size of the memory"),
        )
        .arg(
            Arg::with_name("limit")
                .short("l")
                .long("limit")
                .takes_value(true)
                .value_name("LIMIT")
                .default_value("10000")
                .required(false)
                .help("Sets the maximum number of executed instructions"),
        )
        .get_matches();

    let memory = value_t!(matches.value_of("memory"), usize).unwrap_or_else(|e| e.exit());
    let limit = value_t!(matches.value_of("limit"), u64).unwrap_or_else(|e| e.exit());
    let program = matches.value_of("PROGRAM").unwrap();
    let input = matches.value_of("INPUT").unwrap();

    let result = if matches.is_present("assembly") {
        simx::run_source(program, input, memory, limit)
    } else {
        simx::run_object(program, input, memory, limit)
    };

    match result {
        Ok((report, outcome)) => {
            println!("{}", report);
            if let Err(fault) = outcome {
                eprintln!("simulation fault: {}", fault);
                process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}
