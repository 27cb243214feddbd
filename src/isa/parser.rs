//! Parses the plain-text program format from spec §6 into a [`Program`].
//!
//! Two directives (`.data`, `.text`), case-insensitive, comma-optional.
//! Grounded on `original_source/.../Phase 3/Simulator.py`'s
//! `make_data_segment` for the data-directive shapes and `Core.py`'s label
//! scan for the text section, but done as a single up-front pass instead of
//! per-instruction runtime re-parsing (REDESIGN FLAG, spec §9).

use std::collections::HashMap;

use super::Op;
use crate::error::{SimError, SimResult};

/// One `.data` entry: a label, the base address the loader assigned it, and
/// its preloaded words.
#[derive(Debug, Clone)]
pub struct DataEntry {
    pub label: String,
    pub base_addr: u32,
    pub values: Vec<i32>,
}

/// A fully parsed program: resolved instructions, the text label map, and
/// the data segment to preload into main memory at simulator init.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub ops: Vec<Op>,
    pub labels: HashMap<String, usize>,
    pub data: Vec<DataEntry>,
}

impl Program {
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[derive(PartialEq, Eq, Clone, Copy)]
enum Section {
    None,
    Data,
    Text,
}

fn parse_err(line: usize, message: impl Into<String>) -> SimError {
    SimError::Parse {
        line,
        message: message.into(),
    }
}

fn tokenize(line: &str) -> Vec<String> {
    line.replace(',', " ")
        .split_whitespace()
        .map(ToOwned::to_owned)
        .collect()
}

fn parse_int(tok: &str, line: usize) -> SimResult<i32> {
    if let Some(hex) = tok.strip_prefix("0x").or_else(|| tok.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16)
            .map(|v| v as i32)
            .map_err(|_| parse_err(line, format!("invalid hex literal '{tok}'")))
    } else {
        tok.parse::<i32>()
            .map_err(|_| parse_err(line, format!("invalid integer literal '{tok}'")))
    }
}

fn parse_reg(tok: &str, line: usize) -> SimResult<usize> {
    let stripped = tok.strip_prefix(['x', 'X']).unwrap_or(tok);
    let idx: usize = stripped
        .parse()
        .map_err(|_| parse_err(line, format!("invalid register '{tok}'")))?;
    if idx >= 32 {
        return Err(parse_err(line, format!("register out of range '{tok}'")));
    }
    Ok(idx)
}

fn arg<'a>(args: &'a [String], i: usize, line: usize, what: &str) -> SimResult<&'a str> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| parse_err(line, format!("missing {what} operand")))
}

fn reg(args: &[String], i: usize, line: usize) -> SimResult<usize> {
    parse_reg(arg(args, i, line, "register")?, line)
}

fn imm(args: &[String], i: usize, line: usize) -> SimResult<i32> {
    parse_int(arg(args, i, line, "immediate")?, line)
}

fn mem_operand(tok: &str, line: usize) -> SimResult<(i32, usize)> {
    let open = tok
        .find('(')
        .ok_or_else(|| parse_err(line, format!("expected 'off(reg)', got '{tok}'")))?;
    let close = tok
        .find(')')
        .ok_or_else(|| parse_err(line, format!("expected 'off(reg)', got '{tok}'")))?;
    let off = parse_int(&tok[..open], line)?;
    let reg = parse_reg(&tok[open + 1..close], line)?;
    Ok((off, reg))
}

fn parse_data_line(line: &str, line_no: usize, next_base: &mut u32) -> SimResult<DataEntry> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let label = tokens
        .first()
        .and_then(|t| t.strip_suffix(':'))
        .ok_or_else(|| parse_err(line_no, "expected 'label:' in .data section"))?
        .to_string();
    let directive = tokens
        .get(1)
        .ok_or_else(|| parse_err(line_no, "missing directive after label"))?
        .to_ascii_lowercase();

    let base_addr = *next_base;
    let values = match directive.as_str() {
        ".word" => tokens[2..]
            .iter()
            .map(|t| parse_int(t, line_no))
            .collect::<SimResult<Vec<i32>>>()?,
        ".space" => {
            let bytes: usize = tokens
                .get(2)
                .ok_or_else(|| parse_err(line_no, "missing .space size"))?
                .parse()
                .map_err(|_| parse_err(line_no, "invalid .space size"))?;
            vec![0i32; bytes.div_ceil(4)]
        }
        other => return Err(parse_err(line_no, format!("unknown data directive '{other}'"))),
    };
    *next_base += (values.len() as u32) * 4;
    Ok(DataEntry {
        label,
        base_addr,
        values,
    })
}

fn parse_instruction(
    tokens: &[String],
    line_no: usize,
    labels: &HashMap<String, usize>,
    data_labels: &HashMap<String, u32>,
) -> SimResult<Op> {
    let mnemonic = tokens[0].to_ascii_lowercase();
    let args = &tokens[1..];

    let label_target = |name: &str| -> SimResult<usize> {
        labels
            .get(name)
            .copied()
            .ok_or_else(|| parse_err(line_no, format!("unknown label '{name}'")))
    };

    Ok(match mnemonic.as_str() {
        "add" => Op::Add {
            rd: reg(args, 0, line_no)?,
            rs1: reg(args, 1, line_no)?,
            rs2: reg(args, 2, line_no)?,
        },
        "addi" => Op::Addi {
            rd: reg(args, 0, line_no)?,
            rs1: reg(args, 1, line_no)?,
            imm: imm(args, 2, line_no)?,
        },
        "sub" => Op::Sub {
            rd: reg(args, 0, line_no)?,
            rs1: reg(args, 1, line_no)?,
            rs2: reg(args, 2, line_no)?,
        },
        "slt" => Op::Slt {
            rd: reg(args, 0, line_no)?,
            rs1: reg(args, 1, line_no)?,
            rs2: reg(args, 2, line_no)?,
        },
        "li" => Op::Li {
            rd: reg(args, 0, line_no)?,
            imm: imm(args, 1, line_no)?,
        },
        "la" => {
            let rd = reg(args, 0, line_no)?;
            let label = arg(args, 1, line_no, "label")?;
            let addr = *data_labels
                .get(label)
                .ok_or_else(|| parse_err(line_no, format!("unknown data label '{label}'")))?;
            Op::La { rd, addr: addr as i32 }
        }
        "lw" | "lw_spm" => {
            let rd = reg(args, 0, line_no)?;
            let (off, rs1) = mem_operand(arg(args, 1, line_no, "memory")?, line_no)?;
            if mnemonic == "lw" {
                Op::Lw { rd, rs1, off }
            } else {
                Op::LwSpm { rd, rs1, off }
            }
        }
        "sw" | "sw_spm" => {
            let rs2 = reg(args, 0, line_no)?;
            let (off, rs1) = mem_operand(arg(args, 1, line_no, "memory")?, line_no)?;
            if mnemonic == "sw" {
                Op::Sw { rs1, rs2, off }
            } else {
                Op::SwSpm { rs1, rs2, off }
            }
        }
        "beq" | "bne" | "ble" => {
            let rs1 = reg(args, 0, line_no)?;
            let rs2 = reg(args, 1, line_no)?;
            let target = label_target(arg(args, 2, line_no, "label")?)?;
            match mnemonic.as_str() {
                "beq" => Op::Beq { rs1, rs2, target },
                "bne" => Op::Bne { rs1, rs2, target },
                _ => Op::Ble { rs1, rs2, target },
            }
        }
        "jal" => {
            let rd = reg(args, 0, line_no)?;
            let target = label_target(arg(args, 1, line_no, "label")?)?;
            Op::Jal { rd, target }
        }
        "jr" => Op::Jr {
            rs1: reg(args, 0, line_no)?,
        },
        "j" => Op::J {
            target: label_target(arg(args, 0, line_no, "label")?)?,
        },
        "sync" => Op::Sync,
        "ecall" => Op::Ecall {
            rs1: reg(args, 0, line_no)?,
        },
        other => return Err(parse_err(line_no, format!("unknown mnemonic '{other}'"))),
    })
}

/// Parses `text` into a [`Program`].
///
/// # Errors
/// Returns [`SimError::Parse`] on the first malformed line, a reference to
/// an unknown label, or an instruction appearing before any `.data`/`.text`
/// directive.
pub fn parse_program(text: &str) -> SimResult<Program> {
    let mut section = Section::None;
    let mut data = Vec::new();
    let mut data_base: u32 = 0;
    let mut labels: HashMap<String, usize> = HashMap::new();
    let mut raw_text_lines: Vec<(usize, Vec<String>)> = Vec::new();

    for (i, raw_line) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let lower = line.to_ascii_lowercase();
        if lower == ".data" {
            section = Section::Data;
            continue;
        }
        if lower == ".text" {
            section = Section::Text;
            continue;
        }

        match section {
            Section::Data => data.push(parse_data_line(line, line_no, &mut data_base)?),
            Section::Text => {
                let mut tokens = tokenize(line);
                if let Some(first) = tokens.first().cloned()
                    && let Some(label) = first.strip_suffix(':')
                {
                    labels.insert(label.to_string(), raw_text_lines.len());
                    tokens.remove(0);
                }
                if tokens.is_empty() {
                    continue;
                }
                raw_text_lines.push((line_no, tokens));
            }
            Section::None => {
                return Err(parse_err(line_no, "instruction outside .data/.text"));
            }
        }
    }

    let data_labels: HashMap<String, u32> = data
        .iter()
        .map(|d| (d.label.clone(), d.base_addr))
        .collect();

    let ops = raw_text_lines
        .iter()
        .map(|(line_no, tokens)| parse_instruction(tokens, *line_no, &labels, &data_labels))
        .collect::<SimResult<Vec<Op>>>()?;

    Ok(Program { ops, labels, data })
}
