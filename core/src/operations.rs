use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, GLYPH_SIZE, MEMORY_SIZE, STACK_SIZE};
use crate::error::Fault;
use crate::opcode::Opcode;
use crate::state::State;
use crate::trace::Trace;

/// The state an instruction leaves behind together with its trace entry
pub type Transition = (State, Trace);

/// Program counter of the instruction after the current one
fn next(state: &State) -> u16 {
    state.pc.wrapping_add(0x2)
}

/// Program counter after a conditional skip
fn skip_if(state: &State, condition: bool) -> u16 {
    if condition {
        state.pc.wrapping_add(0x4)
    } else {
        next(state)
    }
}

fn skip_effect(condition: bool, met: &str, unmet: &str) -> String {
    if condition {
        format!("{}, skipping", met)
    } else {
        format!("{}, not skipping", unmet)
    }
}

/// clear
pub fn cls(op: u16, state: &State) -> Transition {
    (
        State {
            pc: next(state),
            frame_buffer: [0; DISPLAY_WIDTH * DISPLAY_HEIGHT],
            ..*state
        },
        Trace::new(op, "CLS", "clearing screen"),
    )
}

/// PC = STACK.pop() + 2
pub fn ret(op: u16, state: &State) -> Transition {
    let trace = Trace::new(op, "RET", "");
    if state.sp == 0 {
        return (*state, trace.with_fault(Fault::StackUnderflow { sp: state.sp }));
    }
    let sp = state.sp - 0x1;
    let pc = state.stack[sp as usize].wrapping_add(0x2);
    (
        State { pc, sp, ..*state },
        Trace {
            effect: format!("returning to {:#05X}", pc),
            ..trace
        },
    )
}

/// PC = addr
pub fn jump(op: u16, state: &State) -> Transition {
    (
        State {
            pc: op.addr(),
            ..*state
        },
        Trace::new(op, "JP nnn", format!("setting PC to {:#05X}", op.addr())),
    )
}

/// STACK.push(PC); PC = addr
pub fn call(op: u16, state: &State) -> Transition {
    let trace = Trace::new(op, "CALL nnn", "");
    if state.sp as usize >= STACK_SIZE {
        return (
            State {
                pc: next(state),
                ..*state
            },
            trace.with_fault(Fault::StackOverflow { sp: state.sp }),
        );
    }
    let mut stack = state.stack;
    stack[state.sp as usize] = state.pc;
    (
        State {
            pc: op.addr(),
            sp: state.sp + 0x1,
            stack,
            ..*state
        },
        Trace {
            effect: format!("calling function at {:#05X}", op.addr()),
            ..trace
        },
    )
}

/// if Vx == kk then pc += 2
pub fn ske(op: u16, state: &State) -> Transition {
    let equal = state.v[op.x() as usize] == op.kk();
    (
        State {
            pc: skip_if(state, equal),
            ..*state
        },
        Trace::new(op, "SE Vx, bb", skip_effect(equal, "equal", "not equal")),
    )
}

/// if Vx != kk then pc += 2
pub fn skne(op: u16, state: &State) -> Transition {
    let unequal = state.v[op.x() as usize] != op.kk();
    (
        State {
            pc: skip_if(state, unequal),
            ..*state
        },
        Trace::new(op, "SNE Vx, bb", skip_effect(unequal, "not equal", "equal")),
    )
}

/// if Vx == Vy then pc += 2
pub fn skre(op: u16, state: &State) -> Transition {
    let equal = state.v[op.x() as usize] == state.v[op.y() as usize];
    (
        State {
            pc: skip_if(state, equal),
            ..*state
        },
        Trace::new(op, "SE Vx, Vy", skip_effect(equal, "equal", "not equal")),
    )
}

/// Vx = kk
pub fn load(op: u16, state: &State) -> Transition {
    let mut v = state.v;
    v[op.x() as usize] = op.kk();
    (
        State {
            pc: next(state),
            v,
            ..*state
        },
        Trace::new(
            op,
            "LD Vx, bb",
            format!("loaded {} into V[{:X}]", op.kk(), op.x()),
        ),
    )
}

/// Vx += kk
/// Add kk to Vx; allow for overflow but implicitly drop it
pub fn add(op: u16, state: &State) -> Transition {
    let mut v = state.v;
    v[op.x() as usize] = v[op.x() as usize].wrapping_add(op.kk());
    (
        State {
            pc: next(state),
            v,
            ..*state
        },
        Trace::new(
            op,
            "ADD Vx, bb",
            format!("incrementing V[{:X}] by {}", op.x(), op.kk()),
        ),
    )
}

/// Applies a register to register operation that leaves VF alone.
fn alu(op: u16, state: &State, mnemonic: &'static str, f: fn(u8, u8) -> u8) -> Transition {
    let mut v = state.v;
    v[op.x() as usize] = f(v[op.x() as usize], v[op.y() as usize]);
    (
        State {
            pc: next(state),
            v,
            ..*state
        },
        Trace::new(
            op,
            mnemonic,
            format!("V[{:X}] = {}", op.x(), v[op.x() as usize]),
        ),
    )
}

/// Applies a register to register operation that yields a result and a flag.
/// The flag is written after the result so VF ends up holding the flag.
fn alu_flagged(
    op: u16,
    state: &State,
    mnemonic: &'static str,
    f: fn(u8, u8) -> (u8, bool),
) -> Transition {
    let (res, flag) = f(state.v[op.x() as usize], state.v[op.y() as usize]);
    let mut v = state.v;
    v[op.x() as usize] = res;
    v[0xF] = flag as u8;
    (
        State {
            pc: next(state),
            v,
            ..*state
        },
        Trace::new(
            op,
            mnemonic,
            format!("V[{:X}] = {}; V[F] = {}", op.x(), res, v[0xF]),
        ),
    )
}

/// Vx = Vy
pub fn mv(op: u16, state: &State) -> Transition {
    alu(op, state, "LD Vx, Vy", |_, vy| vy)
}

/// Vx |= Vy
pub fn or(op: u16, state: &State) -> Transition {
    alu(op, state, "OR Vx, Vy", |vx, vy| vx | vy)
}

/// Vx &= Vy
pub fn and(op: u16, state: &State) -> Transition {
    alu(op, state, "AND Vx, Vy", |vx, vy| vx & vy)
}

/// Vx ^= Vy
pub fn xor(op: u16, state: &State) -> Transition {
    alu(op, state, "XOR Vx, Vy", |vx, vy| vx ^ vy)
}

/// Vx += Vy; VF = carry
pub fn addr(op: u16, state: &State) -> Transition {
    alu_flagged(op, state, "ADD Vx, Vy", |vx, vy| vx.overflowing_add(vy))
}

/// Vx -= Vy; VF = Vx > Vy
pub fn sub(op: u16, state: &State) -> Transition {
    alu_flagged(op, state, "SUB Vx, Vy", |vx, vy| (vx.wrapping_sub(vy), vx > vy))
}

/// Vx >>= 1; VF = the bit shifted out
pub fn shr(op: u16, state: &State) -> Transition {
    alu_flagged(op, state, "SHR Vx", |vx, _| (vx >> 1, (vx & 0x1) == 0x1))
}

/// Vx = Vy - Vx; VF = Vy > Vx
pub fn subn(op: u16, state: &State) -> Transition {
    alu_flagged(op, state, "SUBN Vx, Vy", |vx, vy| (vy.wrapping_sub(vx), vy > vx))
}

/// Vx <<= 1; VF = the bit shifted out
pub fn shl(op: u16, state: &State) -> Transition {
    alu_flagged(op, state, "SHL Vx", |vx, _| (vx << 1, (vx & 0x80) == 0x80))
}

/// if Vx != Vy then pc += 2
pub fn skrne(op: u16, state: &State) -> Transition {
    let unequal = state.v[op.x() as usize] != state.v[op.y() as usize];
    (
        State {
            pc: skip_if(state, unequal),
            ..*state
        },
        Trace::new(op, "SNE Vx, Vy", skip_effect(unequal, "not equal", "equal")),
    )
}

/// I = addr
pub fn loadi(op: u16, state: &State) -> Transition {
    (
        State {
            pc: next(state),
            i: op.addr(),
            ..*state
        },
        Trace::new(op, "LD I, nnn", format!("loaded {:#05X} into I", op.addr())),
    )
}

/// PC = V0 + addr
pub fn jumpi(op: u16, state: &State) -> Transition {
    let pc = u16::from(state.v[0x0]) + op.addr();
    (
        State { pc, ..*state },
        Trace::new(op, "JP V0, nnn", format!("setting PC to {:#05X}", pc)),
    )
}

/// Vx = rand_byte & kk
pub fn rand(op: u16, state: &State, rand_byte: u8) -> Transition {
    let mut v = state.v;
    v[op.x() as usize] = rand_byte & op.kk();
    (
        State {
            pc: next(state),
            v,
            ..*state
        },
        Trace::new(
            op,
            "RND Vx, bb",
            format!("setting V[{:X}] to {}", op.x(), v[op.x() as usize]),
        ),
    )
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer.
/// The origin wraps around the display but the sprite itself is clipped at its edges.
/// Sets VF if any pixels were erased
pub fn draw(op: u16, state: &State) -> Transition {
    let mut frame_buffer = state.frame_buffer;
    let origin_x = state.v[op.x() as usize] as usize % DISPLAY_WIDTH;
    let origin_y = state.v[op.y() as usize] as usize % DISPLAY_HEIGHT;
    let mut collision = 0x0;

    for row in 0..op.n() as usize {
        let y = origin_y + row;
        let addr = state.i as usize + row;
        if y >= DISPLAY_HEIGHT || addr >= MEMORY_SIZE {
            break;
        }
        let sprite_row = state.memory[addr];
        for bit in 0..8 {
            let x = origin_x + bit;
            if x >= DISPLAY_WIDTH {
                break;
            }
            let pixel_value = (sprite_row >> (7 - bit)) & 0x1;
            let index = y * DISPLAY_WIDTH + x;
            collision |= pixel_value & frame_buffer[index];
            frame_buffer[index] ^= pixel_value;
        }
    }

    let mut v = state.v;
    v[0xF] = collision;
    (
        State {
            pc: next(state),
            v,
            frame_buffer,
            ..*state
        },
        Trace::new(
            op,
            "DRW Vx, Vy, n",
            format!(
                "drawing at ({}, {}), height = {}; V[F] = {}",
                origin_x,
                origin_y,
                op.n(),
                collision
            ),
        ),
    )
}

/// Whether the key named by Vx was down in this cycle's sample
fn key_down(op: u16, state: &State) -> bool {
    let key = state.v[op.x() as usize];
    state.keys.get(key as usize).copied().unwrap_or(false)
}

/// if Vx.pressed then pc += 2
pub fn skpr(op: u16, state: &State) -> Transition {
    let pressed = key_down(op, state);
    (
        State {
            pc: skip_if(state, pressed),
            ..*state
        },
        Trace::new(
            op,
            "SKP Vx",
            format!(
                "{:X} pressed? {}",
                state.v[op.x() as usize],
                skip_effect(pressed, "yes", "no")
            ),
        ),
    )
}

/// if !Vx.pressed then pc += 2
pub fn skup(op: u16, state: &State) -> Transition {
    let released = !key_down(op, state);
    (
        State {
            pc: skip_if(state, released),
            ..*state
        },
        Trace::new(
            op,
            "SKNP Vx",
            format!(
                "{:X} pressed? {}",
                state.v[op.x() as usize],
                skip_effect(released, "no", "yes")
            ),
        ),
    )
}

/// Vx = DT
pub fn moved(op: u16, state: &State) -> Transition {
    let mut v = state.v;
    v[op.x() as usize] = state.delay_timer;
    (
        State {
            pc: next(state),
            v,
            ..*state
        },
        Trace::new(
            op,
            "LD Vx, DT",
            format!("setting V[{:X}] = {}", op.x(), state.delay_timer),
        ),
    )
}

/// Vx = key, blocking until one is pressed
/// PC stays put until a key shows up in the cycle's sample, so the instruction repeats.
pub fn keyd(op: u16, state: &State) -> Transition {
    match state.last_key {
        None => (*state, Trace::new(op, "LD Vx, K", "waiting for input")),
        Some(key) => {
            let mut v = state.v;
            v[op.x() as usize] = key;
            (
                State {
                    pc: next(state),
                    v,
                    ..*state
                },
                Trace::new(op, "LD Vx, K", format!("key {:X} pressed", key)),
            )
        }
    }
}

/// DT = Vx
pub fn loads(op: u16, state: &State) -> Transition {
    let delay_timer = state.v[op.x() as usize];
    (
        State {
            pc: next(state),
            delay_timer,
            ..*state
        },
        Trace::new(
            op,
            "LD DT, Vx",
            format!("setting delay timer = {}", delay_timer),
        ),
    )
}

/// ST = Vx
pub fn ld(op: u16, state: &State) -> Transition {
    let sound_timer = state.v[op.x() as usize];
    (
        State {
            pc: next(state),
            sound_timer,
            ..*state
        },
        Trace::new(
            op,
            "LD ST, Vx",
            format!("setting sound timer = {}", sound_timer),
        ),
    )
}

/// I += Vx
pub fn addi(op: u16, state: &State) -> Transition {
    let i = state.i.wrapping_add(u16::from(state.v[op.x() as usize]));
    (
        State {
            pc: next(state),
            i,
            ..*state
        },
        Trace::new(
            op,
            "ADD I, Vx",
            format!("I + V[{:X}] = {:#05X}", op.x(), i),
        ),
    )
}

/// I = Vx * 5
/// Set I to the memory address of the sprite for Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(op: u16, state: &State) -> Transition {
    let i = u16::from(state.v[op.x() as usize]) * GLYPH_SIZE;
    (
        State {
            pc: next(state),
            i,
            ..*state
        },
        Trace::new(
            op,
            "LD F, Vx",
            format!("glyph {:X} is at {:#05X}", state.v[op.x() as usize], i),
        ),
    )
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i, dropping digits past the end
pub fn bcd(op: u16, state: &State) -> Transition {
    let vx = state.v[op.x() as usize];
    let digits = [vx / 100, vx / 10 % 10, vx % 10];
    let mut memory = state.memory;
    let mut effect = String::new();
    for (offset, digit) in digits.iter().enumerate() {
        let addr = state.i as usize + offset;
        if let Some(byte) = memory.get_mut(addr) {
            *byte = *digit;
            effect.push_str(&format!("memory[{:#05X}] = {}; ", addr, digit));
        }
    }
    (
        State {
            pc: next(state),
            memory,
            ..*state
        },
        Trace::new(op, "LD B, Vx", effect.trim_end()),
    )
}

/// mem[I..=I+x] = V0..=Vx
/// Fill memory starting at address i with V0..=Vx, stopping at the end of memory
pub fn stor(op: u16, state: &State) -> Transition {
    let start = state.i as usize;
    let end = (start + op.x() as usize + 1).min(MEMORY_SIZE).max(start);
    let count = end - start;
    let mut memory = state.memory;
    if count > 0 {
        memory[start..end].copy_from_slice(&state.v[..count]);
    }
    (
        State {
            pc: next(state),
            memory,
            ..*state
        },
        clipped(
            Trace::new(
                op,
                "LD [I], Vx",
                format!("stored V[0]..V[{:X}] at {:#05X}", op.x(), start),
            ),
            count,
            op.x(),
        ),
    )
}

/// V0..=Vx = mem[I..=I+x]
/// Fill V0..=Vx with memory starting at address i, stopping at the end of memory
pub fn read(op: u16, state: &State) -> Transition {
    let start = state.i as usize;
    let end = (start + op.x() as usize + 1).min(MEMORY_SIZE).max(start);
    let count = end - start;
    let mut v = state.v;
    if count > 0 {
        v[..count].copy_from_slice(&state.memory[start..end]);
    }
    (
        State {
            pc: next(state),
            v,
            ..*state
        },
        clipped(
            Trace::new(
                op,
                "LD Vx, [I]",
                format!("loaded V[0]..V[{:X}] from {:#05X}", op.x(), start),
            ),
            count,
            op.x(),
        ),
    )
}

/// Catch-all for encodings without a defined operation; PC is left alone.
pub fn unknown(op: u16, state: &State) -> Transition {
    (*state, Trace::new(op, "???", "").with_fault(Fault::UnknownOpcode(op)))
}

/// Notes a register block transfer that ran into the end of memory.
fn clipped(trace: Trace, count: usize, x: u8) -> Trace {
    if count > x as usize {
        return trace;
    }
    Trace {
        effect: format!("{} (clipped to {} registers)", trace.effect, count),
        ..trace
    }
}
