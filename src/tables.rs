use std::collections::HashSet;
use std::sync::LazyLock;

pub struct TableEntry {
    pub name: &'static str,
    pub synopsis: &'static str,
}

pub const REGISTER_SCORE: u32 = 11;
pub const BUILTIN_SCORE: u32 = 10;
pub const LABEL_SCORE: u32 = 5;

pub const REGISTERS: &[TableEntry] = &[
    TableEntry { name: "R0", synopsis: "general purpose register 0" },
    TableEntry { name: "R1", synopsis: "general purpose register 1" },
    TableEntry { name: "R2", synopsis: "general purpose register 2" },
    TableEntry { name: "R3", synopsis: "general purpose register 3" },
    TableEntry { name: "R4", synopsis: "general purpose register 4" },
    TableEntry { name: "R5", synopsis: "general purpose register 5" },
    TableEntry { name: "R6", synopsis: "general purpose register 6 (stack pointer)" },
    TableEntry { name: "R7", synopsis: "general purpose register 7 (return address)" },
];

// Only plain BR is offered; BRn/BRz/BRp combinations are filtered out of label inference instead.
pub const INSTRUCTIONS: &[TableEntry] = &[
    TableEntry { name: "ADD", synopsis: "ADD DR, SR1, SR2|imm5" },
    TableEntry { name: "AND", synopsis: "AND DR, SR1, SR2|imm5" },
    TableEntry { name: "NOT", synopsis: "NOT DR, SR" },
    TableEntry { name: "BR", synopsis: "BR[n][z][p] LABEL" },
    TableEntry { name: "JMP", synopsis: "JMP BaseR" },
    TableEntry { name: "JSR", synopsis: "JSR LABEL" },
    TableEntry { name: "JSRR", synopsis: "JSRR BaseR" },
    TableEntry { name: "LD", synopsis: "LD DR, LABEL" },
    TableEntry { name: "LDI", synopsis: "LDI DR, LABEL" },
    TableEntry { name: "LDR", synopsis: "LDR DR, BaseR, offset6" },
    TableEntry { name: "LEA", synopsis: "LEA DR, LABEL" },
    TableEntry { name: "ST", synopsis: "ST SR, LABEL" },
    TableEntry { name: "STI", synopsis: "STI SR, LABEL" },
    TableEntry { name: "STR", synopsis: "STR SR, BaseR, offset6" },
    TableEntry { name: "TRAP", synopsis: "TRAP trapvect8" },
];

pub const ALIASES: &[TableEntry] = &[
    TableEntry { name: "HALT", synopsis: "TRAP x25" },
    TableEntry { name: "PUTS", synopsis: "TRAP x22" },
    TableEntry { name: "GETC", synopsis: "TRAP x20" },
    TableEntry { name: "OUT", synopsis: "TRAP x21" },
    TableEntry { name: "IN", synopsis: "TRAP x23" },
    TableEntry { name: "RET", synopsis: "JMP R7" },
];

pub const PSEUDO_OPS: &[TableEntry] = &[
    TableEntry { name: ".orig", synopsis: ".orig ADDRESS" },
    TableEntry { name: ".end", synopsis: ".end" },
    TableEntry { name: ".fill", synopsis: ".fill VALUE" },
    TableEntry { name: ".blkw", synopsis: ".blkw COUNT" },
    TableEntry { name: ".stringz", synopsis: ".stringz \"TEXT\"" },
];

/// Lowercased names of every register, instruction, alias and pseudo-op.
static KEYWORDS: LazyLock<HashSet<String>> = LazyLock::new(|| {
    REGISTERS
        .iter()
        .chain(INSTRUCTIONS)
        .chain(ALIASES)
        .chain(PSEUDO_OPS)
        .map(|e| e.name.to_ascii_lowercase())
        .collect()
});

/// Case-insensitive membership test against the keyword set.
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word.to_ascii_lowercase())
}

/// Operand synopsis for a builtin name, if it is one.
pub fn synopsis(name: &str) -> Option<&'static str> {
    REGISTERS
        .iter()
        .chain(INSTRUCTIONS)
        .chain(ALIASES)
        .chain(PSEUDO_OPS)
        .find(|e| e.name.eq_ignore_ascii_case(name))
        .map(|e| e.synopsis)
}
