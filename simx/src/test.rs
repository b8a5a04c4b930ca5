use super::*;

use simcpu::constants;

const HELLO: &str = "\
_start:
    addi r1, r0, 99
    addi r2, r0, 104
    st r2, r1
    addi r2, r0, 101
    st r2, r1
    addi r2, r0, 108
    st r2, r1
    addi r2, r0, 108
    st r2, r1
    addi r2, r0, 111
    st r2, r1
    hlt
";

const CAT: &str = "\
_int:
    ld r3, r1
    st r3, r2
    iret
_start:
    addi r1, r0, 98
    addi r2, r0, 99
    addi r6, r0, 10
loop:
    beq r3, r6, done
    jmp loop
done:
    hlt
";

const PROB1: &str = "\
_start:
    addi r4, r0, 1
    addi r6, r0, 1000
    addi r2, r0, 3
    addi r3, r0, 5
loop:
    beq r4, r6, print
    rem r7, r4, r2
    beq r7, r0, take
    rem r7, r4, r3
    beq r7, r0, take
    jmp next
take:
    add r5, r5, r4
next:
    addi r4, r4, 1
    jmp loop
print:
    addi r1, r0, 99
    addi r7, r0, 100000
    addi r2, r0, 10
digit:
    div r3, r5, r7
    rem r3, r3, r2
    addi r3, r3, 48
    st r3, r1
    div r7, r7, r2
    beq r7, r0, end
    jmp digit
end:
    hlt
";

fn run_source_text(
    source: &str,
    schedule: Schedule,
) -> (Report, Result<(), simcpu::Fault>) {
    let program = simasm::translate(source).unwrap();
    run_program(
        &program,
        schedule,
        constants::DEFAULT_MEMORY_SIZE,
        constants::DEFAULT_INSTR_LIMIT,
    )
    .unwrap()
}

#[test]
fn hello() {
    let (report, outcome) = run_source_text(HELLO, Schedule::new());

    assert_eq!(outcome, Ok(()));
    assert_eq!(report.to_string(), "output: hello\ninstr: 12  ticks: 34");
}

#[test]
fn cat_echoes_scheduled_input_until_the_newline() {
    let schedule = parse_schedule(r#"{"20": "H", "60": "i", "100": "\n"}"#).unwrap();

    let (report, outcome) = run_source_text(CAT, schedule);

    assert_eq!(outcome, Ok(()));
    assert_eq!(report.output, "Hi\n");
}

#[test]
fn prob1_sums_multiples_of_three_and_five() {
    let (report, outcome) = run_source_text(PROB1, Schedule::new());

    assert_eq!(outcome, Ok(()));
    assert_eq!(report.output, "233168");
}

#[test]
fn writing_r0_is_a_runtime_fault_with_counters_reported() {
    let source = "_start:\n    addi r0, r1, 1\n    hlt\n";

    let (report, outcome) = run_source_text(source, Schedule::new());

    assert_eq!(outcome, Err(simcpu::Fault::ZeroRegisterModification));
    assert_eq!(report.output, "");
    assert_eq!(report.instr, 1);
    assert_eq!(report.ticks, 1);
}

#[test]
fn translation_fails_before_anything_runs() {
    let err = simasm::translate("main:\n    hlt\n").unwrap_err();
    assert!(matches!(err, simasm::AsmError::MissingStart));
}

#[test]
fn schedule_is_parsed_from_a_json_mapping() {
    let schedule = parse_schedule(r#"{"10": "H", "20": "e"}"#).unwrap();

    let entries: Vec<(Tick, char)> = schedule.into_iter().collect();
    assert_eq!(entries, vec![(10, 'H'), (20, 'e')]);
}

#[test]
fn schedule_entries_must_be_single_characters() {
    assert!(matches!(
        parse_schedule(r#"{"5": "ab"}"#),
        Err(Error::BadScheduleEntry(_))
    ));
    assert!(matches!(
        parse_schedule(r#"{"5": ""}"#),
        Err(Error::BadScheduleEntry(_))
    ));
    assert!(matches!(parse_schedule("not json"), Err(Error::Schedule(_))));
}

#[test]
fn object_and_schedule_round_trip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let object_path = dir.path().join("hello.json");
    let input_path = dir.path().join("input.json");

    let program = simasm::translate(HELLO).unwrap();
    simobj::write_file(&object_path, &program).unwrap();
    std::fs::write(&input_path, "{}").unwrap();

    let (report, outcome) = run_object(
        &object_path,
        &input_path,
        constants::DEFAULT_MEMORY_SIZE,
        constants::DEFAULT_INSTR_LIMIT,
    )
    .unwrap();

    assert_eq!(outcome, Ok(()));
    assert_eq!(report.to_string(), "output: hello\ninstr: 12  ticks: 34");
}
