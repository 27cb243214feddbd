//! The text-format program parser: directives, labels, and every mnemonic.

use coresim::isa::parser::parse_program;
use coresim::isa::Op;

#[test]
fn data_word_directive_preloads_values() {
    let program = parse_program(
        ".data\narr: .word 10 20 30\n.text\nli x1 0\n",
    )
    .unwrap();
    assert_eq!(program.data.len(), 1);
    assert_eq!(program.data[0].label, "arr");
    assert_eq!(program.data[0].base_addr, 0);
    assert_eq!(program.data[0].values, vec![10, 20, 30]);
}

#[test]
fn data_space_directive_zero_fills_rounded_up_to_words() {
    let program = parse_program(".data\nbuf: .space 10\n.text\nli x1 0\n").unwrap();
    assert_eq!(program.data[0].values, vec![0, 0, 0]);
}

#[test]
fn successive_data_entries_get_contiguous_addresses() {
    let program = parse_program(
        ".data\na: .word 1 2\nb: .word 3\n.text\nli x1 0\n",
    )
    .unwrap();
    assert_eq!(program.data[0].base_addr, 0);
    assert_eq!(program.data[1].base_addr, 8);
}

#[test]
fn la_resolves_to_the_data_labels_base_address() {
    let program = parse_program(
        ".data\na: .word 1\nb: .word 2 3\n.text\nla x1 b\n",
    )
    .unwrap();
    assert_eq!(program.ops[0], Op::La { rd: 1, addr: 4 });
}

#[test]
fn labels_resolve_to_program_index_not_byte_offset() {
    let program = parse_program(
        ".text\nli x1 0\nloop:\naddi x1 x1 1\nj loop\n",
    )
    .unwrap();
    assert_eq!(program.labels["loop"], 1);
    assert_eq!(program.ops[2], Op::J { target: 1 });
}

#[test]
fn every_mnemonic_parses() {
    let text = ".data\nd: .word 0\n.text\n\
        add x1 x2 x3\n\
        addi x1 x2 5\n\
        sub x1 x2 x3\n\
        slt x1 x2 x3\n\
        li x1 7\n\
        la x1 d\n\
        lw x1 0(x2)\n\
        lw_spm x1 0(x2)\n\
        sw x1 0(x2)\n\
        sw_spm x1 0(x2)\n\
        here:\n\
        beq x1 x2 here\n\
        bne x1 x2 here\n\
        ble x1 x2 here\n\
        jal x1 here\n\
        jr x1\n\
        j here\n\
        sync\n\
        ecall x1\n";
    let program = parse_program(text).unwrap();
    assert_eq!(program.len(), 17);
    assert!(matches!(program.ops[0], Op::Add { .. }));
    assert!(matches!(program.ops[16], Op::Ecall { .. }));
}

#[test]
fn comma_separated_operands_are_accepted() {
    let program = parse_program(".text\nadd x1, x2, x3\n").unwrap();
    assert_eq!(program.ops[0], Op::Add { rd: 1, rs1: 2, rs2: 3 });
}

#[test]
fn hex_immediates_parse() {
    let program = parse_program(".text\nli x1 0x10\n").unwrap();
    assert_eq!(program.ops[0], Op::Li { rd: 1, imm: 16 });
}

#[test]
fn unknown_mnemonic_is_a_parse_error() {
    let err = parse_program(".text\nfrobnicate x1\n").unwrap_err();
    assert!(err.to_string().contains("frobnicate"));
}

#[test]
fn unknown_label_reference_is_a_parse_error() {
    let err = parse_program(".text\nj nowhere\n").unwrap_err();
    assert!(err.to_string().contains("nowhere"));
}

#[test]
fn register_index_out_of_range_is_a_parse_error() {
    assert!(parse_program(".text\nli x32 0\n").is_err());
}

#[test]
fn instruction_before_any_section_directive_is_an_error() {
    assert!(parse_program("add x1 x2 x3\n").is_err());
}
