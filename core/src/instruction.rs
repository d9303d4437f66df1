use rand::Rng;

use crate::opcode::{Group, Opcode};
use crate::operations::*;
use crate::state::State;

/// Decodes `op` and applies the matching operation to `state`
///
/// Groups 0, 8, E and F are cased a second time on their low nibble or byte.
/// Encodings without a defined operation fall through to `unknown` which leaves
/// the state, pc included, untouched.
pub fn execute<R: Rng>(op: u16, state: &State, rng: &mut R) -> Transition {
    match op.group() {
        Group::System => match op {
            0x00E0 => cls(op, state),
            0x00EE => ret(op, state),
            _ => unknown(op, state),
        },
        Group::Jump => jump(op, state),
        Group::Call => call(op, state),
        Group::SkipEqualByte => ske(op, state),
        Group::SkipNotEqualByte => skne(op, state),
        Group::SkipEqualRegister => skre(op, state),
        Group::LoadByte => load(op, state),
        Group::AddByte => add(op, state),
        Group::Alu => match op.n() {
            0x0 => mv(op, state),
            0x1 => or(op, state),
            0x2 => and(op, state),
            0x3 => xor(op, state),
            0x4 => addr(op, state),
            0x5 => sub(op, state),
            0x6 => shr(op, state),
            0x7 => subn(op, state),
            0xE => shl(op, state),
            _ => unknown(op, state),
        },
        Group::SkipNotEqualRegister => skrne(op, state),
        Group::LoadIndex => loadi(op, state),
        Group::JumpOffset => jumpi(op, state),
        Group::Random => rand(op, state, rng.gen()),
        Group::Draw => draw(op, state),
        Group::Key => match op.kk() {
            0x9E => skpr(op, state),
            0xA1 => skup(op, state),
            _ => unknown(op, state),
        },
        Group::Misc => match op.kk() {
            0x07 => moved(op, state),
            0x0A => keyd(op, state),
            0x15 => loads(op, state),
            0x18 => ld(op, state),
            0x1E => addi(op, state),
            0x29 => ldspr(op, state),
            0x33 => bcd(op, state),
            0x55 => stor(op, state),
            0x65 => read(op, state),
            _ => unknown(op, state),
        },
    }
}

#[cfg(test)]
mod test_instruction {
    use super::*;
    use crate::constants::{DISPLAY_WIDTH, MEMORY_SIZE};
    use crate::error::Fault;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn run(op: u16, state: &State) -> State {
        let mut rng = StdRng::seed_from_u64(0x8);
        execute(op, state, &mut rng).0
    }

    #[test]
    fn test_00e0_cls() {
        let mut state = State::new();
        state.frame_buffer[0] = 1;
        state.frame_buffer[DISPLAY_WIDTH * 3 + 7] = 1;
        let state = run(0x00E0, &state);
        assert!(state.frame_buffer.iter().all(|pixel| *pixel == 0));
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_00ee_ret() {
        let mut state = State::new();
        state.sp = 0x1;
        state.stack[0x0] = 0x0ABC;
        let state = run(0x00EE, &state);
        assert_eq!(state.sp, 0x0);
        // Return lands after the call that pushed the address
        assert_eq!(state.pc, 0x0ABC + 0x2);
    }

    #[test]
    fn test_00ee_ret_underflows() {
        let state = State::new();
        let mut rng = StdRng::seed_from_u64(0x8);
        let (next, trace) = execute(0x00EE, &state, &mut rng);
        assert_eq!(next.sp, 0x0);
        assert_eq!(next.pc, 0x0200);
        assert_eq!(trace.fault, Some(Fault::StackUnderflow { sp: 0 }));
    }

    #[test]
    fn test_0nnn_is_ignored() {
        let state = State::new();
        let mut rng = StdRng::seed_from_u64(0x8);
        let (next, trace) = execute(0x0123, &state, &mut rng);
        assert_eq!(next.pc, 0x0200);
        assert_eq!(trace.fault, Some(Fault::UnknownOpcode(0x0123)));
    }

    #[test]
    fn test_1nnn_jp() {
        let state = State::new();
        let state = run(0x1ABC, &state);
        assert_eq!(state.pc, 0x0ABC);
    }

    #[test]
    fn test_2nnn_call() {
        let mut state = State::new();
        state.pc = 0x0ABC;
        let state = run(0x2123, &state);
        assert_eq!(state.sp, 0x1);
        assert_eq!(state.stack[0x0], 0x0ABC);
        assert_eq!(state.pc, 0x0123);
    }

    #[test]
    fn test_2nnn_call_overflows() {
        let mut state = State::new();
        state.sp = 0x10;
        let mut rng = StdRng::seed_from_u64(0x8);
        let (next, trace) = execute(0x2123, &state, &mut rng);
        assert_eq!(next.sp, 0x10);
        assert_eq!(next.pc, 0x0202);
        assert_eq!(trace.fault, Some(Fault::StackOverflow { sp: 16 }));
    }

    #[test]
    fn test_call_then_return_resumes_after_call() {
        let mut state = State::new();
        state.pc = 0x0300;
        state.memory[0x0400..0x0402].copy_from_slice(&[0x00, 0xEE]);
        let state = run(0x2400, &state);
        let state = run(0x00EE, &state);
        assert_eq!(state.pc, 0x0302);
        assert_eq!(state.sp, 0x0);
    }

    #[test]
    fn test_3xkk_se_skips() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        let state = run(0x3111, &state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_3xkk_se_doesntskip() {
        let state = State::new();
        let state = run(0x3111, &state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_4xkk_sne_skips() {
        let state = State::new();
        let state = run(0x4111, &state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_4xkk_sne_doesntskip() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        let state = run(0x4111, &state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_5xy0_se_skips() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x11;
        let state = run(0x5120, &state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_5xy0_se_doesntskip() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        let state = run(0x5120, &state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_6xkk_ld() {
        let state = State::new();
        let state = run(0x6122, &state);
        assert_eq!(state.v[0x1], 0x22);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_7xkk_add() {
        let mut state = State::new();
        state.v[0x1] = 0x1;
        let state = run(0x7122, &state);
        assert_eq!(state.v[0x1], 0x23);
    }

    #[test]
    fn test_7xkk_add_wraps_without_flag() {
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        let state = run(0x7102, &state);
        assert_eq!(state.v[0x1], 0x01);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy0_ld() {
        let mut state = State::new();
        state.v[0x2] = 0x1;
        let state = run(0x8120, &state);
        assert_eq!(state.v[0x1], 0x1);
    }

    #[test]
    fn test_8xy1_or() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        let state = run(0x8121, &state);
        assert_eq!(state.v[0x1], 0x7);
    }

    #[test]
    fn test_8xy2_and() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        let state = run(0x8122, &state);
        assert_eq!(state.v[0x1], 0x2);
    }

    #[test]
    fn test_8xy3_xor() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        let state = run(0x8123, &state);
        assert_eq!(state.v[0x1], 0x5);
    }

    #[test]
    fn test_8xy4_add_nocarry() {
        let mut state = State::new();
        state.v[0x1] = 10;
        state.v[0x2] = 20;
        let state = run(0x8124, &state);
        assert_eq!(state.v[0x1], 30);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy4_add_carry() {
        let mut state = State::new();
        state.v[0x1] = 250;
        state.v[0x2] = 10;
        let state = run(0x8124, &state);
        assert_eq!(state.v[0x1], 4);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy5_sub_noborrow() {
        let mut state = State::new();
        state.v[0x1] = 0x33;
        state.v[0x2] = 0x11;
        let state = run(0x8125, &state);
        assert_eq!(state.v[0x1], 0x22);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy5_sub_borrow() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x12;
        let state = run(0x8125, &state);
        assert_eq!(state.v[0x1], 0xFF);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy5_sub_equal_operands_clear_flag() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x11;
        state.v[0xF] = 0x1;
        let state = run(0x8125, &state);
        assert_eq!(state.v[0x1], 0x0);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy6_shr_lsb() {
        let mut state = State::new();
        state.v[0x1] = 0b0000_0011;
        let state = run(0x8106, &state);
        assert_eq!(state.v[0x1], 0b0000_0001);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy6_shr_nolsb() {
        let mut state = State::new();
        state.v[0x1] = 0x4;
        let state = run(0x8106, &state);
        assert_eq!(state.v[0x1], 0x2);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy7_subn_noborrow() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x33;
        let state = run(0x8127, &state);
        assert_eq!(state.v[0x1], 0x22);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy7_subn_borrow() {
        let mut state = State::new();
        state.v[0x1] = 0x12;
        state.v[0x2] = 0x11;
        let state = run(0x8127, &state);
        assert_eq!(state.v[0x1], 0xFF);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xye_shl_msb() {
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        let state = run(0x810E, &state);
        // 0xFF * 2 = 0x01FE
        assert_eq!(state.v[0x1], 0xFE);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xye_shl_nomsb() {
        let mut state = State::new();
        state.v[0x1] = 0x4;
        let state = run(0x810E, &state);
        assert_eq!(state.v[0x1], 0x8);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy8_is_ignored() {
        let mut state = State::new();
        state.v[0x1] = 0x4;
        let state = run(0x8128, &state);
        assert_eq!(state.v[0x1], 0x4);
        assert_eq!(state.pc, 0x0200);
    }

    #[test]
    fn test_9xy0_sne_skips() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        let state = run(0x9120, &state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_9xy0_sne_doesntskip() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x11;
        let state = run(0x9120, &state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_annn_ld() {
        let state = State::new();
        let state = run(0xAABC, &state);
        assert_eq!(state.i, 0xABC);
    }

    #[test]
    fn test_bnnn_jp() {
        let mut state = State::new();
        state.v[0x0] = 0x2;
        let state = run(0xBABC, &state);
        assert_eq!(state.pc, 0xABE);
    }

    #[test]
    fn test_bnnn_jp_adds_offset_to_whole_address() {
        let mut state = State::new();
        state.v[0x0] = 0x10;
        let state = run(0xBFF8, &state);
        assert_eq!(state.pc, 0x1008);
    }

    #[test]
    fn test_cxkk_rnd_is_masked() {
        let state = State::new();
        for mask in [0x00, 0x0F, 0xF0].iter() {
            let state = run(0xC100 | *mask, &state);
            assert_eq!(state.v[0x1] & !(*mask as u8), 0);
            assert_eq!(state.pc, 0x0202);
        }
    }

    #[test]
    fn test_dxyn_drw_draws() {
        let mut state = State::new();
        state.v[0x0] = 0x1;
        // Draw the 0x0 sprite with a 1x 1y offset
        let state = run(0xD005, &state);
        let rows: [[u8; 4]; 5] = [
            [1, 1, 1, 1],
            [1, 0, 0, 1],
            [1, 0, 0, 1],
            [1, 0, 0, 1],
            [1, 1, 1, 1],
        ];
        for (dy, row) in rows.iter().enumerate() {
            for (dx, pixel) in row.iter().enumerate() {
                assert_eq!(state.pixel(1 + dx, 1 + dy), *pixel);
            }
        }
        assert_eq!(state.frame_buffer.iter().filter(|p| **p == 1).count(), 14);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_dxyn_drw_collides() {
        let mut state = State::new();
        state.frame_buffer[0] = 1;
        let state = run(0xD001, &state);
        assert_eq!(state.v[0xF], 0x1);
        assert_eq!(state.pixel(0, 0), 0);
    }

    #[test]
    fn test_dxyn_drw_xors() {
        let mut state = State::new();
        // 0 1 0 1 -> Set
        state.frame_buffer[2..6].copy_from_slice(&[0, 1, 0, 1]);
        state.v[0x0] = 0x2;
        state.v[0x1] = 0x0;
        // 1 1 1 1 -> Draw xor (top row of the 0 glyph)
        let state = run(0xD011, &state);
        assert_eq!(state.frame_buffer[2..6], [1, 0, 1, 0]);
    }

    #[test]
    fn test_dxyn_drw_clips_right_edge() {
        let mut state = State::new();
        state.i = 0x300;
        state.memory[0x300..0x302].copy_from_slice(&[0xFF, 0xFF]);
        state.v[0x1] = 60;
        state.v[0x2] = 0;
        let state = run(0xD122, &state);
        for y in 0..2 {
            let row = &state.frame_buffer[y * DISPLAY_WIDTH..(y + 1) * DISPLAY_WIDTH];
            assert_eq!(row[60..], [1, 1, 1, 1]);
            // nothing wrapped around to the left edge
            assert_eq!(row[..4], [0, 0, 0, 0]);
        }
        assert_eq!(state.frame_buffer.iter().filter(|p| **p == 1).count(), 8);
    }

    #[test]
    fn test_dxyn_drw_clips_bottom_edge() {
        let mut state = State::new();
        state.v[0x1] = 0;
        state.v[0x2] = 30;
        // 5 rows of the 0 glyph, only 2 fit
        let state = run(0xD125, &state);
        assert_eq!(state.frame_buffer.iter().filter(|p| **p == 1).count(), 6);
        assert_eq!(state.pixel(0, 0), 0);
    }

    #[test]
    fn test_dxyn_drw_wraps_origin() {
        let mut state = State::new();
        state.v[0x1] = 64 + 3;
        state.v[0x2] = 32 + 2;
        let state = run(0xD121, &state);
        assert_eq!(state.pixel(3, 2), 1);
        assert_eq!(state.pixel(6, 2), 1);
    }

    #[test]
    fn test_dxyn_drw_stops_at_end_of_memory() {
        let mut state = State::new();
        state.i = (MEMORY_SIZE - 1) as u16;
        state.memory[MEMORY_SIZE - 1] = 0x80;
        let state = run(0xD00F, &state);
        assert_eq!(state.frame_buffer.iter().filter(|p| **p == 1).count(), 1);
    }

    #[test]
    fn test_ex9e_skp_skips() {
        let mut state = State::new();
        state.keys[0xE] = true;
        state.v[0x1] = 0xE;
        let state = run(0xE19E, &state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_ex9e_skp_doesntskip() {
        let state = State::new();
        let state = run(0xE19E, &state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_ex9e_skp_ignores_keys_past_f() {
        let mut state = State::new();
        state.v[0x1] = 0x42;
        let state = run(0xE19E, &state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_exa1_sknp_skips() {
        let state = State::new();
        let state = run(0xE1A1, &state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_exa1_sknp_doesntskip() {
        let mut state = State::new();
        state.keys[0xE] = true;
        state.v[0x1] = 0xE;
        let state = run(0xE1A1, &state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_fx07_ld() {
        let mut state = State::new();
        state.delay_timer = 0xF;
        let state = run(0xF107, &state);
        assert_eq!(state.v[0x1], 0xF);
    }

    #[test]
    fn test_fx0a_ld_waits_without_key() {
        let state = State::new();
        let state = run(0xF10A, &state);
        assert_eq!(state.pc, 0x0200);
    }

    #[test]
    fn test_fx0a_ld_stores_key() {
        let mut state = State::new();
        state.last_key = Some(0xB);
        let state = run(0xF10A, &state);
        assert_eq!(state.v[0x1], 0xB);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_fx15_ld() {
        let mut state = State::new();
        state.v[0x1] = 0xF;
        let state = run(0xF115, &state);
        assert_eq!(state.delay_timer, 0xF);
    }

    #[test]
    fn test_fx18_ld() {
        let mut state = State::new();
        state.v[0x1] = 0xF;
        let state = run(0xF118, &state);
        assert_eq!(state.sound_timer, 0xF);
    }

    #[test]
    fn test_fx1e_add() {
        let mut state = State::new();
        state.i = 0x1;
        state.v[0x1] = 0x1;
        let state = run(0xF11E, &state);
        assert_eq!(state.i, 0x2);
    }

    #[test]
    fn test_fx29_ld() {
        let mut state = State::new();
        state.v[0x1] = 0x2;
        let state = run(0xF129, &state);
        assert_eq!(state.i, 0xA);
    }

    #[test]
    fn test_fx33_ld() {
        let mut state = State::new();
        // 0x7B -> 123
        state.v[0x1] = 0x7B;
        state.i = 0x200;
        let state = run(0xF133, &state);
        assert_eq!(state.memory[0x200..0x203], [0x1, 0x2, 0x3]);
    }

    #[test]
    fn test_fx33_ld_drops_digits_past_memory() {
        let mut state = State::new();
        state.v[0x1] = 249;
        state.i = (MEMORY_SIZE - 2) as u16;
        let state = run(0xF133, &state);
        assert_eq!(state.memory[MEMORY_SIZE - 2..], [0x2, 0x4]);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_fx55_ld() {
        let mut state = State::new();
        state.i = 0x200;
        state.v[0x0..0x5].copy_from_slice(&[0x1, 0x2, 0x3, 0x4, 0x5]);
        let state = run(0xF455, &state);
        assert_eq!(state.memory[0x200..0x205], [0x1, 0x2, 0x3, 0x4, 0x5]);
        assert_eq!(state.memory[0x205], 0x0);
    }

    #[test]
    fn test_fx55_ld_stops_at_end_of_memory() {
        let mut state = State::new();
        state.i = (MEMORY_SIZE - 2) as u16;
        state.v[0x0..0x4].copy_from_slice(&[0x1, 0x2, 0x3, 0x4]);
        let state = run(0xF355, &state);
        assert_eq!(state.memory[MEMORY_SIZE - 2..], [0x1, 0x2]);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_fx65_ld() {
        let mut state = State::new();
        state.i = 0x200;
        state.memory[0x200..0x205].copy_from_slice(&[0x1, 0x2, 0x3, 0x4, 0x5]);
        let state = run(0xF465, &state);
        assert_eq!(state.v[0x0..0x5], [0x1, 0x2, 0x3, 0x4, 0x5]);
    }

    #[test]
    fn test_fx65_ld_stops_at_end_of_memory() {
        let mut state = State::new();
        state.i = MEMORY_SIZE as u16;
        state.v[0x0] = 0x9;
        let state = run(0xF265, &state);
        assert_eq!(state.v[0x0], 0x9);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_every_operation_is_traced() {
        let state = State::new();
        let mut rng = StdRng::seed_from_u64(0x8);
        let (_, trace) = execute(0x6122, &state, &mut rng);
        assert_eq!(trace.opcode, 0x6122);
        assert_eq!(trace.mnemonic, "LD Vx, bb");
        assert_eq!(trace.effect, "loaded 34 into V[1]");
        assert_eq!(trace.fault, None);
    }
}
