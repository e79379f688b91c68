//! Fuzzing entry points for fcode-core
//!
//! Each function takes arbitrary bytes and must never panic unless the
//! produced container is malformed. They are plain functions so any fuzz
//! driver (or the unit tests below) can call them.

use fcode_core::{Command, EncoderConfig, FcodeSession, Move};

fn f32_at(data: &[u8], at: usize) -> f32 {
    let mut raw = [0u8; 4];
    for (i, b) in raw.iter_mut().enumerate() {
        *b = data.get(at + i).copied().unwrap_or(0);
    }
    f32::from_le_bytes(raw)
}

/// Decode one command from the head of `data`, returning it and the bytes consumed
fn next_command(data: &[u8]) -> Option<(Command, usize)> {
    let op = *data.first()?;
    let arg = f32_at(data, 1);
    let cmd = match op % 12 {
        0 => {
            let flags = data.get(1).copied().unwrap_or(0);
            let v = |i: usize| f32_at(data, 2 + 4 * i);
            let mv = Move::from_raw(flags, v(0), v(1), v(2), v(3), v(4), v(5), v(6));
            return Some((Command::Move(mv), 30.min(data.len())));
        }
        1 => Command::Home,
        2 => Command::Pause { to_standby: op & 0x80 != 0 },
        3 => Command::Sleep { seconds: arg },
        4 => Command::SetHeaterTemperature {
            temperature: arg,
            wait: op & 0x80 != 0,
        },
        5 => Command::SetFanSpeed { strength: arg },
        6 => Command::SetPwm { strength: arg },
        7 => Command::EnableMotor,
        8 => Command::DisableMotor,
        9 => Command::Anchor { value: arg.to_bits() },
        10 => Command::Comment {
            message: String::from("fuzz"),
        },
        _ => Command::Error {
            critical: op & 0x80 != 0,
            message: String::from("FUZZ"),
        },
    };
    Some((cmd, 5.min(data.len())))
}

/// Encode commands derived from raw bytes and check the container framing
pub fn fuzz_commands(data: &[u8]) {
    let Ok(mut session) = FcodeSession::memory(EncoderConfig::default()) else {
        return;
    };

    let mut rest = data;
    while let Some((cmd, used)) = next_command(rest) {
        session.apply(&cmd);
        rest = &rest[used..];
    }

    let Ok(buf) = session.into_bytes() else {
        return;
    };
    check_framing(&buf);
}

/// Parse bytes as a JSON command list and encode it
pub fn fuzz_job_json(data: &[u8]) {
    let Ok(commands) = serde_json::from_slice::<Vec<Command>>(data) else {
        return;
    };
    let Ok(mut session) = FcodeSession::memory(EncoderConfig::default()) else {
        return;
    };
    session.apply_all(&commands);
    if let Ok(buf) = session.into_bytes() {
        check_framing(&buf);
    }
}

fn u32_at(buf: &[u8], at: usize) -> usize {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&buf[at..at + 4]);
    u32::from_le_bytes(raw) as usize
}

/// Walk the length fields; panics if they do not describe `buf` exactly
fn check_framing(buf: &[u8]) {
    assert_eq!(&buf[..8], b"FCx0001\n");
    let script_len = u32_at(buf, 8);
    let meta_at = 12 + script_len + 4;
    let meta_len = u32_at(buf, meta_at);
    let mut pos = meta_at + 4 + meta_len + 4;
    loop {
        let len = u32_at(buf, pos);
        pos += 4;
        if len == 0 {
            break;
        }
        pos += len;
    }
    assert_eq!(pos, buf.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzz_commands_empty() {
        fuzz_commands(&[]);
    }

    #[test]
    fn test_fuzz_commands_random() {
        fuzz_commands(&[0x12, 0x34, 0x56, 0x78]);
    }

    #[test]
    fn test_fuzz_commands_nan_moves() {
        fuzz_commands(&[0xFF; 1024]);
        fuzz_commands(&[0x00, 0x7F, 0x00, 0x00, 0xC0, 0x7F]);
    }

    #[test]
    fn test_fuzz_job_json() {
        fuzz_job_json(b"");
        fuzz_job_json(b"[{\"cmd\":\"home\"},{\"cmd\":\"sleep\",\"seconds\":-3}]");
        fuzz_job_json(b"[{\"cmd\":\"move\",\"x\":1e39}]");
    }
}
