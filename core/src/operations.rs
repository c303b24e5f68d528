use rand::{Rng, RngCore};

use crate::config::{KeyMode, Quirks};
use crate::constants::{FLAG, FONT_GLYPH_SIZE, NO_KEY};
use crate::error::{Error, Result};
use crate::keypad::Keypad;
use crate::opcode::Opcode;
use crate::state::State;

// Every operation sees the pc after it has already been moved past the
// current instruction; skips move it a further 2.

fn skip_if(state: &mut State, condition: bool) {
    if condition {
        state.pc = state.pc.wrapping_add(0x2);
    }
}

/// no-op; machine code routines don't exist here
pub fn sys(_state: &mut State, _addr: u16) {}

/// clear
pub fn cls(state: &mut State) {
    state.frame_buffer.iter_mut().for_each(|pixel| *pixel = 0);
    state.draw_flag = true;
}

/// PC = STACK.pop()
pub fn ret(state: &mut State) -> Result<()> {
    let top = state.sp.checked_sub(1).ok_or(Error::StackUnderflow)?;
    let addr = *state.stack.get(top).ok_or(Error::StackOverflow { depth: state.sp })?;
    state.sp = top;
    state.pc = addr;
    Ok(())
}

/// PC = addr
pub fn jump(state: &mut State, addr: u16) {
    state.pc = addr;
}

/// STACK.push(PC); PC = addr
pub fn call(state: &mut State, addr: u16) -> Result<()> {
    if state.sp >= state.stack.len() {
        return Err(Error::StackOverflow { depth: state.sp });
    }
    state.stack[state.sp] = state.pc;
    state.sp += 1;
    state.pc = addr;
    Ok(())
}

/// if Vx == kk then pc += 2
pub fn ske(state: &mut State, x: u8, kk: u8) {
    let condition = state.v[x as usize] == kk;
    skip_if(state, condition);
}

/// if Vx != kk then pc += 2
pub fn skne(state: &mut State, x: u8, kk: u8) {
    let condition = state.v[x as usize] != kk;
    skip_if(state, condition);
}

/// if Vx == Vy then pc += 2
pub fn skre(state: &mut State, x: u8, y: u8) {
    let condition = state.v[x as usize] == state.v[y as usize];
    skip_if(state, condition);
}

/// Vx = kk
pub fn load(state: &mut State, x: u8, kk: u8) {
    state.v[x as usize] = kk;
}

/// Vx += kk
/// Wraps on overflow; VF is left alone
pub fn add(state: &mut State, x: u8, kk: u8) {
    state.v[x as usize] = state.v[x as usize].wrapping_add(kk);
}

/// Vx = Vy
pub fn mv(state: &mut State, x: u8, y: u8) {
    state.v[x as usize] = state.v[y as usize];
}

/// Vx |= Vy
pub fn or(state: &mut State, x: u8, y: u8) {
    state.v[x as usize] |= state.v[y as usize];
}

/// Vx &= Vy
pub fn and(state: &mut State, x: u8, y: u8) {
    state.v[x as usize] &= state.v[y as usize];
}

/// Vx ^= Vy
pub fn xor(state: &mut State, x: u8, y: u8) {
    state.v[x as usize] ^= state.v[y as usize];
}

/// Vx += Vy; VF = carry
pub fn addr(state: &mut State, x: u8, y: u8) {
    let sum = u16::from(state.v[x as usize]) + u16::from(state.v[y as usize]);
    state.v[x as usize] = (sum & 0xFF) as u8;
    state.v[FLAG] = (sum >> 8) as u8 & 0x1;
}

/// Vx = Vx - Vy; VF = !borrow
pub fn sub(state: &mut State, x: u8, y: u8) {
    let difference = i16::from(state.v[x as usize]) - i16::from(state.v[y as usize]);
    state.v[x as usize] = (difference & 0xFF) as u8;
    state.v[FLAG] = u8::from(difference >= 0);
}

/// Vx = Vy - Vx; VF = !borrow
pub fn subn(state: &mut State, x: u8, y: u8) {
    let difference = i16::from(state.v[y as usize]) - i16::from(state.v[x as usize]);
    state.v[x as usize] = (difference & 0xFF) as u8;
    state.v[FLAG] = u8::from(difference >= 0);
}

/// Vx >>= 1; VF = bit shifted out
/// Unless SHIFT_INPLACE is set, Vy is copied into Vx first
pub fn shr(state: &mut State, x: u8, y: u8) {
    let value = shift_source(state, x, y);
    state.v[x as usize] = value >> 1;
    state.v[FLAG] = value & 0x1;
}

/// Vx <<= 1; VF = bit shifted out
/// Unless SHIFT_INPLACE is set, Vy is copied into Vx first
pub fn shl(state: &mut State, x: u8, y: u8) {
    let value = shift_source(state, x, y);
    state.v[x as usize] = value << 1;
    state.v[FLAG] = value >> 7;
}

fn shift_source(state: &State, x: u8, y: u8) -> u8 {
    if state.config().quirks.contains(Quirks::SHIFT_INPLACE) {
        state.v[x as usize]
    } else {
        state.v[y as usize]
    }
}

/// if Vx != Vy then pc += 2
pub fn skrne(state: &mut State, x: u8, y: u8) {
    let condition = state.v[x as usize] != state.v[y as usize];
    skip_if(state, condition);
}

/// I = addr
pub fn loadi(state: &mut State, addr: u16) {
    state.i = addr;
}

/// PC = V0 + addr
/// With JUMP_VX_OFFSET the register is instead the high nibble of addr (BXNN)
pub fn jumpi(state: &mut State, addr: u16) {
    let register = if state.config().quirks.contains(Quirks::JUMP_VX_OFFSET) {
        addr.x()
    } else {
        0x0
    };
    state.pc = addr + u16::from(state.v[register as usize]);
}

/// Vx = rand_byte & kk
pub fn rand(state: &mut State, x: u8, kk: u8, rng: &mut dyn RngCore) {
    let rand_byte: u8 = rng.gen();
    state.v[x as usize] = rand_byte & kk;
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer.
///
/// The starting position wraps around the display, the sprite itself is
/// clipped at the right and bottom edges.
/// Sets VF if any pixels are erased
pub fn draw(state: &mut State, x: u8, y: u8, n: u8) -> Result<()> {
    let (width, height) = (state.width(), state.height());
    let x_start = state.v[x as usize] as usize % width;
    let y_start = state.v[y as usize] as usize % height;
    let rows = (n as usize).min(height - y_start);
    let cols = 8usize.min(width - x_start);

    let sprite_start = state.i as usize;
    if rows > 0 {
        state.check_range(sprite_start, rows)?;
    }

    // any pixel switched off by the XOR counts as a collision
    let mut collision = 0x0;
    for row in 0..rows {
        let sprite_byte = state.memory[sprite_start + row];
        let line = (y_start + row) * width + x_start;
        for col in 0..cols {
            let pixel_value = (sprite_byte >> (7 - col)) & 0x1;
            collision |= state.frame_buffer[line + col] & pixel_value;
            state.frame_buffer[line + col] ^= pixel_value;
        }
    }

    state.v[FLAG] = collision;
    state.draw_flag = true;
    Ok(())
}

/// The key the key-press instructions should compare against
/// No key at all reads as NO_KEY, the same value FX0A stores for it
fn current_key(state: &State, keypad: &mut dyn Keypad) -> u8 {
    let key = match state.config().key_mode {
        KeyMode::UseGivenKey => state.key,
        KeyMode::GetKey => keypad.poll(),
    };
    key.unwrap_or(NO_KEY)
}

/// if key == Vx then pc += 2
pub fn skpr(state: &mut State, x: u8, keypad: &mut dyn Keypad) {
    let condition = current_key(state, keypad) == state.v[x as usize];
    skip_if(state, condition);
}

/// if key != Vx then pc += 2
pub fn skup(state: &mut State, x: u8, keypad: &mut dyn Keypad) {
    let condition = current_key(state, keypad) != state.v[x as usize];
    skip_if(state, condition);
}

/// Vx = DT
pub fn moved(state: &mut State, x: u8) {
    state.v[x as usize] = state.delay_timer;
}

/// await keypress for Vx
/// With a given key this doesn't wait at all; no key at all reads as NO_KEY
pub fn keyd(state: &mut State, x: u8, keypad: &mut dyn Keypad) -> Result<()> {
    let key = match state.config().key_mode {
        KeyMode::UseGivenKey => state.key.unwrap_or(NO_KEY),
        KeyMode::GetKey => keypad.wait().ok_or(Error::KeyWaitCancelled)?,
    };
    state.v[x as usize] = key;
    Ok(())
}

/// DT = Vx
pub fn loads(state: &mut State, x: u8) {
    state.delay_timer = state.v[x as usize];
}

/// ST = Vx
pub fn ld(state: &mut State, x: u8) {
    state.sound_timer = state.v[x as usize];
}

/// I += Vx
/// With FX1E_OVERFLOW, VF = I left the 12-bit address space
pub fn addi(state: &mut State, x: u8) {
    state.i = state.i.wrapping_add(u16::from(state.v[x as usize]));
    if state.config().quirks.contains(Quirks::FX1E_OVERFLOW) {
        state.v[FLAG] = u8::from(state.i & 0xF000 != 0);
    }
}

/// I = font_address + (Vx & 0xF) * 5
/// Set I to the memory address of the font sprite for the low nibble of Vx
pub fn ldspr(state: &mut State, x: u8) {
    let glyph = u16::from(state.v[x as usize] & 0x0F);
    state.i = state.config().font_address + glyph * FONT_GLYPH_SIZE;
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(state: &mut State, x: u8) -> Result<()> {
    let value = state.v[x as usize];
    let bcd = [value / 100, value / 10 % 10, value % 10];
    let i = state.i as usize;
    state.memory_range_mut(i, 3)?.copy_from_slice(&bcd);
    Ok(())
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(state: &mut State, x: u8) -> Result<()> {
    let count = x as usize + 1;
    let (i, v) = (state.i as usize, state.v);
    state.memory_range_mut(i, count)?.copy_from_slice(&v[..count]);
    advance_index(state, count);
    Ok(())
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(state: &mut State, x: u8) -> Result<()> {
    let count = x as usize + 1;
    let mut v = state.v;
    v[..count].copy_from_slice(state.memory_range(state.i as usize, count)?);
    state.v = v;
    advance_index(state, count);
    Ok(())
}

/// With FX55_FX65_INC_I, leave I one past the last address touched
fn advance_index(state: &mut State, count: usize) {
    if state.config().quirks.contains(Quirks::FX55_FX65_INC_I) {
        state.i = state.i.wrapping_add(count as u16);
    }
}
