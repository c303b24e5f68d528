/// Nanoseconds per CPU cycle; roughly 500Hz
pub const CLOCK_SPEED: u64 = 2_000_000;

/// Approximately 8 CPU cycles elapse per 60Hz timer decrement at `CLOCK_SPEED`
pub const CPU_CYCLES_PER_TIMER_CYCLE: u16 = 8;

/// How many past states are kept around for rewinding
pub const MAX_SAVED_STATES: usize = 600;

pub const MEMORY_SIZE: usize = 4096;
pub const STACK_SIZE: usize = 64;
pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;
pub const SUPERCHIP_DISPLAY_WIDTH: usize = 128;
pub const SUPERCHIP_DISPLAY_HEIGHT: usize = 64;

/// 0x000 - 0x200 is reserved for the interpreter; the font lives in there
pub const FONT_ADDRESS: u16 = 0x050;

/// 0x200 is where ROMs are loaded into memory
pub const PROGRAM_ADDRESS: u16 = 0x200;

/// Largest memory a 16-bit index register can address
pub const MAX_MEMORY_SIZE: usize = 0x1_0000;

/// Each glyph in the font is 5 rows tall
pub const FONT_GLYPH_SIZE: u16 = 5;

/// Value stored by FX0A when no key has been given
pub const NO_KEY: u8 = 0xFF;

/// VF doubles as the carry/borrow/collision flag
pub const FLAG: usize = 0xF;

/// # Font
/// Sprites for the hexadecimal digits 0..F, 4 pixels wide and 5 tall.
///
/// ```text
/// 0xF0 ****
/// 0x90 *  *
/// 0x90 *  *
/// 0x90 *  *
/// 0xF0 ****
/// ```
pub const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
