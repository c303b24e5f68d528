//! Property-based tests for instruction invariants.
//!
//! Each test loads a tiny program at 0x200 and runs it through the public
//! `Chip8` interface, so the fetch/pc-advance path is exercised as well.

use emu8_core::{Chip8, Config, Quirks};
use proptest::prelude::*;

/// A machine with `program` loaded at the program address
fn setup(config: &Config, program: &[u16]) -> Chip8 {
    let bytes: Vec<u8> = program.iter().flat_map(|op| op.to_be_bytes()).collect();
    let mut chip8 = Chip8::new(config).unwrap();
    chip8.load_rom(&mut &bytes[..]).unwrap();
    chip8.seed(0);
    chip8
}

fn run(chip8: &mut Chip8, cycles: usize) {
    for _ in 0..cycles {
        chip8.advance_cpu().unwrap();
    }
}

/// Registers V0..VE; VF is left out where it would alias the flag
fn register() -> impl Strategy<Value = u16> {
    0u16..0xF
}

proptest! {
    #[test]
    fn prop_load_then_add_wraps(x in register(), nn in any::<u8>(), nn2 in any::<u8>(), flag in any::<u8>()) {
        let program = [0x6000 | x << 8 | u16::from(nn), 0x7000 | x << 8 | u16::from(nn2)];
        let mut chip8 = setup(&Config::default(), &program);
        chip8.state_mut().v[0xF] = flag;
        run(&mut chip8, 2);
        prop_assert_eq!(chip8.state().v[x as usize], nn.wrapping_add(nn2));
        prop_assert_eq!(chip8.state().v[0xF], flag);
    }

    #[test]
    fn prop_add_registers_sets_carry(vx in any::<u8>(), vy in any::<u8>()) {
        let mut chip8 = setup(&Config::default(), &[0x8124]);
        chip8.state_mut().v[0x1] = vx;
        chip8.state_mut().v[0x2] = vy;
        run(&mut chip8, 1);
        let sum = u16::from(vx) + u16::from(vy);
        prop_assert_eq!(chip8.state().v[0x1], (sum & 0xFF) as u8);
        prop_assert_eq!(chip8.state().v[0xF], u8::from(sum > 0xFF));
    }

    #[test]
    fn prop_sub_sets_no_borrow(vx in any::<u8>(), vy in any::<u8>()) {
        let mut chip8 = setup(&Config::default(), &[0x8125]);
        chip8.state_mut().v[0x1] = vx;
        chip8.state_mut().v[0x2] = vy;
        run(&mut chip8, 1);
        prop_assert_eq!(chip8.state().v[0x1], vx.wrapping_sub(vy));
        prop_assert_eq!(chip8.state().v[0xF], u8::from(vx >= vy));
    }

    #[test]
    fn prop_subn_sets_no_borrow(vx in any::<u8>(), vy in any::<u8>()) {
        let mut chip8 = setup(&Config::default(), &[0x8127]);
        chip8.state_mut().v[0x1] = vx;
        chip8.state_mut().v[0x2] = vy;
        run(&mut chip8, 1);
        prop_assert_eq!(chip8.state().v[0x1], vy.wrapping_sub(vx));
        prop_assert_eq!(chip8.state().v[0xF], u8::from(vy >= vx));
    }

    #[test]
    fn prop_shift_right_uses_vy_unless_inplace(vx in any::<u8>(), vy in any::<u8>(), inplace in any::<bool>()) {
        let mut config = Config::default();
        config.quirks.set(Quirks::SHIFT_INPLACE, inplace);
        let mut chip8 = setup(&config, &[0x8126]);
        chip8.state_mut().v[0x1] = vx;
        chip8.state_mut().v[0x2] = vy;
        run(&mut chip8, 1);
        let source = if inplace { vx } else { vy };
        prop_assert_eq!(chip8.state().v[0x1], source >> 1);
        prop_assert_eq!(chip8.state().v[0xF], source & 0x1);
        prop_assert_eq!(chip8.state().v[0x2], vy);
    }

    #[test]
    fn prop_shift_left_uses_vy_unless_inplace(vx in any::<u8>(), vy in any::<u8>(), inplace in any::<bool>()) {
        let mut config = Config::default();
        config.quirks.set(Quirks::SHIFT_INPLACE, inplace);
        let mut chip8 = setup(&config, &[0x812E]);
        chip8.state_mut().v[0x1] = vx;
        chip8.state_mut().v[0x2] = vy;
        run(&mut chip8, 1);
        let source = if inplace { vx } else { vy };
        prop_assert_eq!(chip8.state().v[0x1], source << 1);
        prop_assert_eq!(chip8.state().v[0xF], source >> 7);
    }

    #[test]
    fn prop_bcd_digits(value in any::<u8>()) {
        let mut chip8 = setup(&Config::default(), &[0xA300, 0xF533]);
        chip8.state_mut().v[0x5] = value;
        run(&mut chip8, 2);
        let digits = &chip8.state().memory[0x300..0x303];
        prop_assert_eq!(u32::from(digits[0]) * 100 + u32::from(digits[1]) * 10 + u32::from(digits[2]), u32::from(value));
        prop_assert!(digits.iter().all(|&d| d < 10));
    }

    #[test]
    fn prop_store_then_read_restores_registers(
        values in prop::array::uniform16(any::<u8>()),
        x in 0u16..0x10,
        inc_i in any::<bool>()
    ) {
        let mut config = Config::default();
        config.quirks.set(Quirks::FX55_FX65_INC_I, inc_i);
        let mut chip8 = setup(&config, &[0xA400, 0xF055 | x << 8, 0xA400, 0xF065 | x << 8]);
        chip8.state_mut().v = values;
        run(&mut chip8, 2);
        let count = x as usize + 1;
        prop_assert_eq!(&chip8.state().memory[0x400..0x400 + count], &values[..count]);
        let expected_i = if inc_i { 0x400 + count as u16 } else { 0x400 };
        prop_assert_eq!(chip8.state().i, expected_i);

        chip8.state_mut().v = [0; 16];
        run(&mut chip8, 2);
        prop_assert_eq!(&chip8.state().v[..count], &values[..count]);
        prop_assert!(chip8.state().v[count..].iter().all(|&v| v == 0));
    }

    #[test]
    fn prop_drawing_twice_erases_and_collides(x in any::<u8>(), y in any::<u8>(), sprite in 0x80u8..=0xFF) {
        // V0 = x, V1 = y, I = 0x300, draw, draw
        let program = [
            0x6000 | u16::from(x),
            0x6100 | u16::from(y),
            0xA300,
            0xD011,
            0xD011,
        ];
        let mut chip8 = setup(&Config::default(), &program);
        chip8.state_mut().memory[0x300] = sprite;
        run(&mut chip8, 4);
        prop_assert_eq!(chip8.state().v[0xF], 0);
        prop_assert!(chip8.state().frame_buffer.iter().any(|&p| p == 1));
        run(&mut chip8, 1);
        prop_assert_eq!(chip8.state().v[0xF], 1);
        prop_assert!(chip8.state().frame_buffer.iter().all(|&p| p == 0));
    }

    #[test]
    fn prop_drawing_never_wraps_past_the_edge(x in 0usize..64, y in 0usize..32) {
        let program = [0x6000 | x as u16, 0x6100 | y as u16, 0xA300, 0xD01F];
        let mut chip8 = setup(&Config::default(), &program);
        for byte in &mut chip8.state_mut().memory[0x300..0x30F] {
            *byte = 0xFF;
        }
        run(&mut chip8, 4);
        let state = chip8.state();
        let expected = 8usize.min(64 - x) * 15usize.min(32 - y);
        prop_assert_eq!(state.frame_buffer.iter().filter(|&&p| p == 1).count(), expected);
        for row in 0..32 {
            for col in 0..64 {
                let inside = col >= x && col < x + 8 && row >= y && row < y + 15;
                prop_assert_eq!(state.pixel(col, row), u8::from(inside));
            }
        }
    }
}

#[test]
fn test_draw_clips_at_right_edge() {
    let config = Config::default();
    let program = [0x6000 | (config.display_width as u16 - 1), 0x6100, 0xA300, 0xD011];
    let mut chip8 = setup(&config, &program);
    chip8.state_mut().memory[0x300] = 0xFF;
    run(&mut chip8, 4);
    let state = chip8.state();
    assert_eq!(state.pixel(config.display_width - 1, 0), 1);
    assert_eq!(state.pixel(0, 0), 0);
    assert_eq!(state.frame_buffer.iter().filter(|&&p| p == 1).count(), 1);
}

#[test]
fn test_call_return_round_trip() {
    let mut chip8 = setup(&Config::default(), &[0x2300]);
    chip8.state_mut().memory[0x300..0x302].copy_from_slice(&[0x00, 0xEE]);
    run(&mut chip8, 1);
    assert_eq!(chip8.state().pc, 0x300);
    run(&mut chip8, 1);
    assert_eq!(chip8.state().pc, 0x202);
}

#[test]
fn test_store_read_with_incrementing_i() {
    let mut config = Config::default();
    config.quirks.insert(Quirks::FX55_FX65_INC_I);
    let mut chip8 = setup(&config, &[0xA300, 0xF355, 0xA300, 0xF365]);
    chip8.state_mut().v[..4].copy_from_slice(&[1, 2, 3, 4]);
    run(&mut chip8, 2);
    assert_eq!(chip8.state().i, 0x304);
    chip8.state_mut().v[..4].copy_from_slice(&[0, 0, 0, 0]);
    run(&mut chip8, 2);
    assert_eq!(chip8.state().v[..4], [1, 2, 3, 4]);
    assert_eq!(chip8.state().i, 0x304);
}

#[test]
fn test_bcd_234() {
    let mut chip8 = setup(&Config::default(), &[0x60EA, 0xA300, 0xF033]);
    run(&mut chip8, 3);
    assert_eq!(chip8.state().memory[0x300..0x303], [2, 3, 4]);
}
