use super::*;
use simcpu::isa::{Opcode, Register};

fn sample_program() -> Program {
    Program::from(
        1,
        vec![
            Instruction::Plain {
                opcode: Opcode::Iret,
            },
            Instruction::RegRegImm {
                opcode: Opcode::Addi,
                rd: Register::R1,
                rs: Register::R0,
                imm: 99,
            },
            Instruction::ThreeReg {
                opcode: Opcode::Add,
                rd: Register::R2,
                rs1: Register::R1,
                rs2: Register::R3,
            },
            Instruction::RegReg {
                opcode: Opcode::St,
                rd: Register::R2,
                rs: Register::R1,
            },
            Instruction::Branch {
                opcode: Opcode::Beq,
                rs1: Register::R2,
                rs2: Register::R0,
                imm: 2,
            },
            Instruction::Imm {
                opcode: Opcode::Jmp,
                imm: -4,
            },
            Instruction::Plain {
                opcode: Opcode::Hlt,
            },
        ],
    )
}

#[test]
fn stable_field_order() {
    let encoded = serde_json::to_string(&sample_program()).unwrap();

    assert_eq!(
        encoded,
        concat!(
            r#"{"start":1,"code":["#,
            r#"{"opcode":"iret"},"#,
            r#"{"opcode":"addi","rd":"r1","rs":"r0","imm":99},"#,
            r#"{"opcode":"add","rd":"r2","rs1":"r1","rs2":"r3"},"#,
            r#"{"opcode":"st","rd":"r2","rs":"r1"},"#,
            r#"{"opcode":"beq","rs1":"r2","rs2":"r0","imm":2},"#,
            r#"{"opcode":"jmp","imm":-4},"#,
            r#"{"opcode":"hlt"}"#,
            r#"]}"#
        )
    );
}

#[test]
fn round_trip() {
    let program = sample_program();
    let encoded = serde_json::to_string(&program).unwrap();
    let decoded = read(&mut encoded.as_bytes()).unwrap();

    assert_eq!(program, decoded);
}

#[test]
fn encoding_is_idempotent() {
    let program = sample_program();
    let first = serde_json::to_string(&program).unwrap();
    let reread = read(&mut first.as_bytes()).unwrap();
    let second = serde_json::to_string(&reread).unwrap();

    assert_eq!(first, second);
}

#[test]
fn shape_mismatch_is_rejected() {
    // `add` is a three-register opcode; two registers infer the memory
    // shape, which must not pass validation.
    let text = r#"{"start":0,"code":[{"opcode":"add","rd":"r1","rs":"r2"}]}"#;

    match read(&mut text.as_bytes()) {
        Err(ObjError::ShapeMismatch { index: 0 }) => {}
        other => panic!("expected a shape mismatch, got {:?}", other),
    }
}

#[test]
fn unknown_opcode_is_rejected() {
    let text = r#"{"start":0,"code":[{"opcode":"nop"}]}"#;

    assert!(read(&mut text.as_bytes()).is_err());
}

#[test]
fn unknown_register_is_rejected() {
    let text = r#"{"start":0,"code":[{"opcode":"ld","rd":"r9","rs":"r1"}]}"#;

    assert!(read(&mut text.as_bytes()).is_err());
}

#[test]
fn write_read_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.json");

    let program = sample_program();
    write_file(&path, &program).unwrap();
    let reread = read_file(&path).unwrap();

    assert_eq!(program, reread);
}
