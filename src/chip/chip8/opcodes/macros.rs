/// Builds a dispatch table of `$len` decoders. Every slot not listed resolves to
/// `decode_nop`, so unknown sub-opcodes of a family are silently ignored.
///
/// ```ignore
/// static TABLE: [Decoder; 16] = dispatch_table!(16; 0x0 => decode_cls, 0xE => decode_ret);
/// ```
macro_rules! dispatch_table {
    ($len:expr; $($key:expr => $decoder:expr),* $(,)?) => {{
        let mut table: [Decoder; $len] = [decode_nop as Decoder; $len];
        $(
            table[$key] = $decoder;
        )*
        table
    }};
}

/// Defines a decoder `$name` producing `Instruction::$variant` with the fields
/// taken from the opcode through the listed accessors.
macro_rules! define_decoder {
    ($name:ident, $variant:ident) => {
        fn $name(_opcode: Opcode) -> Instruction {
            Instruction::$variant
        }
    };
    ($name:ident, $variant:ident { $($field:ident: $accessor:ident),+ }) => {
        fn $name(opcode: Opcode) -> Instruction {
            Instruction::$variant {
                $($field: opcode.$accessor()),+
            }
        }
    };
}
