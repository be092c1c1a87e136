//! NMEA sentence framing and field extraction

use crate::devices::error::{CommandError, ParseFlags};
use heapless::String;

/// Longest command body accepted by [`frame_command`]
pub const COMMAND_CAPACITY: usize = 128;

/// XOR of every byte between `$` and `*`
pub fn checksum(body: &[u8]) -> u8 {
    body.iter().fold(0, |acc, &b| acc ^ b)
}

/// Frame a sentence body as `$<body>*<CS>\r\n`
///
/// A leading `$` in `body` is ignored.
pub fn frame_command(body: &str) -> Result<String<COMMAND_CAPACITY>, CommandError> {
    use core::fmt::Write;

    let body = body.strip_prefix('$').unwrap_or(body);
    let mut line = String::new();
    write!(line, "${}*{:02X}\r\n", body, checksum(body.as_bytes()))
        .map_err(|_| CommandError::Overflow)?;
    Ok(line)
}

/// Pull one comma-separated field out of a received NMEA buffer
///
/// Finds the first `$<command>` sentence in `buffer` and returns field
/// `element`, where element 0 is the sentence name itself. With
/// `command = "GNGGA"`, element 2 is the latitude.
///
/// # Errors
///
/// - `ParseFlags::REFERENCE` when the buffer holds no `$` at all
/// - `ParseFlags::COMMAND` when no sentence with that name is present
/// - `ParseFlags::DATA` when the field is missing, empty or not text
pub fn parse_field<'a>(
    buffer: &'a [u8],
    command: &str,
    element: usize,
) -> Result<&'a str, CommandError> {
    if !buffer.contains(&b'$') {
        return Err(CommandError::Parse(ParseFlags::REFERENCE));
    }

    let name = command.trim_start_matches('$').as_bytes();
    let start = buffer
        .windows(name.len() + 1)
        .position(|w| w[0] == b'$' && &w[1..] == name && !name.is_empty())
        .ok_or(CommandError::Parse(ParseFlags::COMMAND))?;

    // Sentence runs from the name to the checksum marker or end of line
    let sentence = &buffer[start + 1..];
    let end = sentence
        .iter()
        .position(|&b| matches!(b, b'*' | b'\r' | b'\n' | b'$'))
        .unwrap_or(sentence.len());
    let sentence =
        core::str::from_utf8(&sentence[..end]).map_err(|_| CommandError::Parse(ParseFlags::DATA))?;

    match sentence.split(',').nth(element) {
        Some(field) if !field.is_empty() => Ok(field),
        _ => Err(CommandError::Parse(ParseFlags::DATA)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GGA: &[u8] = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";

    #[test]
    fn test_checksum_matches_known_sentence() {
        let body = b"GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,";
        assert_eq!(checksum(body), 0x47);
    }

    #[test]
    fn test_frame_command() {
        let line = frame_command("PMTK101").unwrap();
        assert_eq!(line.as_str(), "$PMTK101*32\r\n");

        let line = frame_command("$PMTK220,1000").unwrap();
        assert_eq!(line.as_str(), "$PMTK220,1000*1F\r\n");
    }

    #[test]
    fn test_frame_command_overflow() {
        let body = [b'A'; COMMAND_CAPACITY];
        let body = core::str::from_utf8(&body).unwrap();
        assert_eq!(frame_command(body), Err(CommandError::Overflow));
    }

    #[test]
    fn test_parse_field_elements() {
        assert_eq!(parse_field(GGA, "GPGGA", 0), Ok("GPGGA"));
        assert_eq!(parse_field(GGA, "GPGGA", 1), Ok("123519"));
        assert_eq!(parse_field(GGA, "GPGGA", 2), Ok("4807.038"));
        assert_eq!(parse_field(GGA, "GPGGA", 7), Ok("08"));
    }

    #[test]
    fn test_parse_field_finds_sentence_mid_buffer() {
        let mut buf = std::vec::Vec::new();
        buf.extend_from_slice(b"3,W*6A\r\n$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A\r\n");
        buf.extend_from_slice(GGA);

        assert_eq!(parse_field(&buf, "GPGGA", 9), Ok("545.4"));
        assert_eq!(parse_field(&buf, "GPRMC", 7), Ok("022.4"));
    }

    #[test]
    fn test_parse_field_errors() {
        assert_eq!(
            parse_field(b"no sentence here", "GPGGA", 1),
            Err(CommandError::Parse(ParseFlags::REFERENCE))
        );
        assert_eq!(
            parse_field(GGA, "GNRMC", 1),
            Err(CommandError::Parse(ParseFlags::COMMAND))
        );
        // Empty differential-age field
        assert_eq!(
            parse_field(GGA, "GPGGA", 13),
            Err(CommandError::Parse(ParseFlags::DATA))
        );
        assert_eq!(
            parse_field(GGA, "GPGGA", 40),
            Err(CommandError::Parse(ParseFlags::DATA))
        );
    }

    #[test]
    fn test_parse_field_stops_at_truncated_sentence() {
        let partial = b"$GPGGA,123519,4807.0";
        assert_eq!(parse_field(partial, "GPGGA", 2), Ok("4807.0"));
        assert_eq!(
            parse_field(partial, "GPGGA", 3),
            Err(CommandError::Parse(ParseFlags::DATA))
        );
    }
}
