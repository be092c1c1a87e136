//! GSM Click driver (SIMCom-class cellular modem)
//!
//! AT-command glue over UART. Commands are assembled in a bounded buffer and
//! length-checked before anything goes on the wire, then sent whole or one
//! byte at a time with a configurable gap for modems whose UART cannot keep
//! up. Responses accumulate in a receive buffer that [`Gsm::wait_response`]
//! scans for a final result code.
//!
//! # Example
//!
//! ```ignore
//! let mut config = GsmConfig::default();
//! config.map_mikrobus(&platform.mikrobus(MikrobusSocket::One));
//! let mut gsm = Gsm::init(&mut platform, &config)?;
//!
//! gsm.power_on(platform.timer_mut())?;
//! gsm.send_command(platform.timer_mut(), "AT")?;
//! gsm.wait_response(platform.timer_mut())?;
//! gsm.send_sms_text(platform.timer_mut(), "+15550100", "hello")?;
//! ```

use super::{error::CommandError, traits::ClickDriver};
use crate::platform::{
    error::{PlatformError, UartError},
    traits::{
        GpioInterface, GpioMode, MikrobusPinout, PinName, Platform, TimerInterface, UartConfig,
        UartInterface, UartPins,
    },
    Result,
};
use heapless::{String, Vec};

/// Longest command line, terminator included
pub const COMMAND_CAPACITY: usize = 256;

/// Receive buffer size
pub const RESPONSE_CAPACITY: usize = 256;

/// Bytes kept from the end of a full receive buffer
const RESPONSE_TAIL: usize = 32;

/// Final result codes that reject a command
const REJECT_CODES: [&[u8]; 3] = [b"ERROR", b"+CME ERROR", b"+CMS ERROR"];

/// Longest single-part SMS in text mode
pub const SMS_MAX_LEN: usize = 160;

const TERMINATOR: &str = "\r\n";
const CTRL_Z: u8 = 0x1A;

/// Result of a GSM operation
pub type GsmResult<T> = core::result::Result<T, CommandError>;

/// GSM Click configuration
#[derive(Debug, Clone, Copy)]
pub struct GsmConfig {
    /// UART transmit (MCU side)
    pub tx: PinName,
    /// UART receive (MCU side)
    pub rx: PinName,
    /// Power key
    pub pwr: PinName,
    /// Request to send (output)
    pub rts: PinName,
    /// Clear to send (input, active low)
    pub cts: PinName,
    /// Ring indicator (input, active low)
    pub ri: PinName,
    /// UART baud rate
    pub baud_rate: u32,
    /// Gap between transmitted bytes; zero sends the whole line at once
    pub inter_byte_delay_us: u32,
    /// Length of the power-key pulse
    pub power_pulse_ms: u32,
    /// Receive polls before [`CommandError::Timeout`]
    pub max_polls: u32,
    /// Delay between receive polls
    pub poll_interval_ms: u32,
}

impl Default for GsmConfig {
    fn default() -> Self {
        Self {
            tx: PinName::Unconnected,
            rx: PinName::Unconnected,
            pwr: PinName::Unconnected,
            rts: PinName::Unconnected,
            cts: PinName::Unconnected,
            ri: PinName::Unconnected,
            baud_rate: 9600,
            inter_byte_delay_us: 0,
            power_pulse_ms: 1200,
            max_polls: 500,
            poll_interval_ms: 10,
        }
    }
}

impl GsmConfig {
    /// Take UART and control lines from a MikroBUS socket
    ///
    /// PWR sits on RST, RTS on CS, CTS on INT and RI on PWM.
    pub fn map_mikrobus(&mut self, pinout: &MikrobusPinout) {
        self.tx = pinout.tx;
        self.rx = pinout.rx;
        self.pwr = pinout.rst;
        self.rts = pinout.cs;
        self.cts = pinout.int;
        self.ri = pinout.pwm;
    }
}

/// What ends a wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    /// `OK` or an error result code
    Final,
    /// The `>` text-entry prompt
    Prompt,
}

/// GSM Click driver
pub struct Gsm<U: UartInterface, G: GpioInterface> {
    uart: U,
    pwr: G,
    rts: G,
    cts: G,
    ri: G,
    response: Vec<u8, RESPONSE_CAPACITY>,
    inter_byte_delay_us: u32,
    power_pulse_ms: u32,
    max_polls: u32,
    poll_interval_ms: u32,
}

impl<U: UartInterface, G: GpioInterface> Gsm<U, G> {
    /// Open the UART and control lines
    pub fn init<P>(platform: &mut P, config: &GsmConfig) -> Result<Self>
    where
        P: Platform<Uart = U, Gpio = G>,
    {
        let uart = platform.create_uart(
            UartPins {
                tx: config.tx,
                rx: config.rx,
            },
            UartConfig::eight_n_one(config.baud_rate),
        )?;
        let mut pwr = platform.create_gpio(config.pwr, GpioMode::OutputPushPull)?;
        let mut rts = platform.create_gpio(config.rts, GpioMode::OutputPushPull)?;
        let cts = platform.create_gpio(config.cts, GpioMode::Input)?;
        let ri = platform.create_gpio(config.ri, GpioMode::Input)?;

        pwr.set_low()?;
        rts.set_low()?;

        crate::log_info!("GSM Click ready at {} baud", config.baud_rate);
        Ok(Self::new(uart, pwr, rts, cts, ri, config))
    }

    /// Wrap already configured lines, taking timing from `config`
    pub fn new(uart: U, pwr: G, rts: G, cts: G, ri: G, config: &GsmConfig) -> Self {
        Self {
            uart,
            pwr,
            rts,
            cts,
            ri,
            response: Vec::new(),
            inter_byte_delay_us: config.inter_byte_delay_us,
            power_pulse_ms: config.power_pulse_ms,
            max_polls: config.max_polls,
            poll_interval_ms: config.poll_interval_ms,
        }
    }

    /// Generic UART write; returns bytes queued
    pub fn generic_write(&mut self, data: &[u8]) -> Result<usize> {
        self.uart.write(data)
    }

    /// Generic non-blocking UART read; returns bytes actually read
    pub fn generic_read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        self.uart.read(buffer)
    }

    /// Pulse the power key to boot the modem
    pub fn power_on<T: TimerInterface>(&mut self, timer: &mut T) -> Result<()> {
        self.pwr.set_high()?;
        timer.delay_ms(self.power_pulse_ms)?;
        self.pwr.set_low()?;
        crate::log_info!("GSM power key pulsed");
        Ok(())
    }

    fn transmit<T: TimerInterface>(&mut self, timer: &mut T, data: &[u8]) -> Result<()> {
        if self.inter_byte_delay_us == 0 {
            return write_all(&mut self.uart, data);
        }
        for byte in data {
            write_all(&mut self.uart, core::slice::from_ref(byte))?;
            timer.delay_us(self.inter_byte_delay_us)?;
        }
        Ok(())
    }

    fn send_line<T: TimerInterface>(&mut self, timer: &mut T, parts: &[&str]) -> GsmResult<()> {
        let mut line: String<COMMAND_CAPACITY> = String::new();
        for part in parts.iter().chain(core::iter::once(&TERMINATOR)) {
            if line.push_str(part).is_err() {
                crate::log_warn!("GSM command exceeds {} bytes", COMMAND_CAPACITY);
                return Err(CommandError::Overflow);
            }
        }
        self.response.clear();
        crate::log_trace!("GSM tx: {}", line.as_str());
        self.transmit(timer, line.as_bytes())?;
        Ok(())
    }

    /// Send `command` followed by CR LF
    pub fn send_command<T: TimerInterface>(&mut self, timer: &mut T, command: &str) -> GsmResult<()> {
        self.send_line(timer, &[command])
    }

    /// Send `command=parameter`
    pub fn send_command_with_parameter<T: TimerInterface>(
        &mut self,
        timer: &mut T,
        command: &str,
        parameter: &str,
    ) -> GsmResult<()> {
        self.send_line(timer, &[command, "=", parameter])
    }

    /// Send the test form `command=?`
    pub fn send_command_check<T: TimerInterface>(
        &mut self,
        timer: &mut T,
        command: &str,
    ) -> GsmResult<()> {
        self.send_line(timer, &[command, "=?"])
    }

    /// Send the read form `command?`
    pub fn send_command_question<T: TimerInterface>(
        &mut self,
        timer: &mut T,
        command: &str,
    ) -> GsmResult<()> {
        self.send_line(timer, &[command, "?"])
    }

    /// Define PDP context 1 with the carrier's access point name
    pub fn set_sim_apn<T: TimerInterface>(&mut self, timer: &mut T, apn: &str) -> GsmResult<()> {
        self.send_line(timer, &["AT+CGDCONT=1,\"IP\",\"", apn, "\""])
    }

    /// Send a text-mode SMS
    ///
    /// Switches to text mode, opens the message to `number`, waits for the
    /// `>` prompt and sends `text` terminated by Ctrl-Z. Sizes are checked
    /// up front; an oversize number or text sends nothing.
    pub fn send_sms_text<T: TimerInterface>(
        &mut self,
        timer: &mut T,
        number: &str,
        text: &str,
    ) -> GsmResult<()> {
        // "AT+CMGS=\"" + number + "\"\r\n"
        if text.len() > SMS_MAX_LEN || number.len() + 12 > COMMAND_CAPACITY {
            crate::log_warn!("SMS does not fit: {} bytes", text.len());
            return Err(CommandError::Overflow);
        }

        self.send_command(timer, "AT+CMGF=1")?;
        self.wait_response(timer)?;

        self.send_line(timer, &["AT+CMGS=\"", number, "\""])?;
        self.wait_for(timer, Expect::Prompt)?;

        self.response.clear();
        self.transmit(timer, text.as_bytes())?;
        self.transmit(timer, &[CTRL_Z])?;
        self.wait_response(timer)
    }

    fn poll_rx(&mut self) -> Result<()> {
        let mut chunk = [0u8; 64];
        loop {
            let n = self.uart.read(&mut chunk)?;
            if n == 0 {
                return Ok(());
            }
            for &b in &chunk[..n] {
                if self.response.is_full() {
                    // Result codes come last, so slide the tail to the front
                    crate::log_debug!("GSM response buffer full, dropping old data");
                    let start = self.response.len() - RESPONSE_TAIL;
                    self.response.copy_within(start.., 0);
                    self.response.truncate(RESPONSE_TAIL);
                }
                let _ = self.response.push(b);
            }
        }
    }

    fn scan(&self, expect: Expect) -> Option<GsmResult<()>> {
        let rx = self.response.as_slice();
        if REJECT_CODES.iter().any(|code| starts_line(rx, code)) {
            return Some(Err(CommandError::Rejected));
        }
        let done = match expect {
            Expect::Final => starts_line(rx, b"OK\r\n"),
            Expect::Prompt => contains(rx, b">"),
        };
        done.then_some(Ok(()))
    }

    fn wait_for<T: TimerInterface>(&mut self, timer: &mut T, expect: Expect) -> GsmResult<()> {
        for _ in 0..self.max_polls {
            self.poll_rx()?;
            if let Some(result) = self.scan(expect) {
                if result.is_err() {
                    crate::log_warn!("GSM command rejected");
                }
                return result;
            }
            timer.delay_ms(self.poll_interval_ms)?;
        }
        crate::log_warn!("GSM response timeout");
        Err(CommandError::Timeout)
    }

    /// Poll for a final result code
    ///
    /// Waits at most `max_polls × poll_interval_ms`. `OK` completes,
    /// `ERROR`, `+CME ERROR` and `+CMS ERROR` give
    /// [`CommandError::Rejected`]. The received text stays available from
    /// [`Gsm::response`] either way.
    pub fn wait_response<T: TimerInterface>(&mut self, timer: &mut T) -> GsmResult<()> {
        self.wait_for(timer, Expect::Final)
    }

    /// Bytes received since the last command was sent
    pub fn response(&self) -> &[u8] {
        &self.response
    }

    /// Drive RTS
    pub fn set_rts(&mut self, high: bool) -> Result<()> {
        self.rts.write(high)
    }

    /// Whether the modem accepts data (CTS low)
    pub fn clear_to_send(&self) -> bool {
        !self.cts.read()
    }

    /// Whether the modem signals an incoming call or SMS (RI low)
    pub fn ring_indicator(&self) -> bool {
        !self.ri.read()
    }

    /// Underlying UART
    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }
}

impl<U: UartInterface, G: GpioInterface> ClickDriver for Gsm<U, G> {
    fn name(&self) -> &'static str {
        "GSM Click"
    }
}

/// Write every byte of `data`, failing if the UART stops accepting
pub(crate) fn write_all<U: UartInterface>(uart: &mut U, data: &[u8]) -> Result<()> {
    let mut sent = 0;
    while sent < data.len() {
        let n = uart.write(&data[sent..])?;
        if n == 0 {
            return Err(PlatformError::Uart(UartError::WriteFailed));
        }
        sent += n;
    }
    Ok(())
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// `needle` occurs at the start of the buffer or right after a line feed
fn starts_line(haystack: &[u8], needle: &[u8]) -> bool {
    haystack
        .windows(needle.len())
        .enumerate()
        .any(|(i, w)| w == needle && (i == 0 || haystack[i - 1] == b'\n'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockGpio, MockPlatform, MockTimer, MockUart};
    use crate::platform::traits::MikrobusSocket;

    fn gsm_with(config: GsmConfig) -> Gsm<MockUart, MockGpio> {
        let mut cts = MockGpio::new_input();
        cts.set_input_state(true);
        let mut ri = MockGpio::new_input();
        ri.set_input_state(true);
        Gsm::new(
            MockUart::new(UartConfig::eight_n_one(config.baud_rate)),
            MockGpio::new_output(),
            MockGpio::new_output(),
            cts,
            ri,
            &config,
        )
    }

    fn gsm() -> Gsm<MockUart, MockGpio> {
        gsm_with(GsmConfig::default())
    }

    #[test]
    fn test_command_forms() {
        let mut gsm = gsm();
        let mut timer = MockTimer::new();

        gsm.send_command(&mut timer, "AT").unwrap();
        gsm.send_command_with_parameter(&mut timer, "AT+CMGF", "1")
            .unwrap();
        gsm.send_command_check(&mut timer, "AT+CMGF").unwrap();
        gsm.send_command_question(&mut timer, "AT+CSQ").unwrap();

        assert_eq!(
            gsm.uart_mut().tx_buffer(),
            b"AT\r\nAT+CMGF=1\r\nAT+CMGF=?\r\nAT+CSQ?\r\n"
        );
        assert_eq!(timer.delay_calls(), 0);
    }

    #[test]
    fn test_set_sim_apn() {
        let mut gsm = gsm();
        let mut timer = MockTimer::new();
        gsm.set_sim_apn(&mut timer, "internet").unwrap();
        assert_eq!(
            gsm.uart_mut().tx_buffer(),
            b"AT+CGDCONT=1,\"IP\",\"internet\"\r\n"
        );
    }

    #[test]
    fn test_oversize_command_sends_nothing() {
        let mut gsm = gsm();
        let mut timer = MockTimer::new();
        let long = [b'A'; COMMAND_CAPACITY];
        let long = core::str::from_utf8(&long).unwrap();

        assert_eq!(
            gsm.send_command(&mut timer, long),
            Err(CommandError::Overflow)
        );
        assert!(gsm.uart_mut().tx_buffer().is_empty());
        assert_eq!(gsm.uart_mut().write_calls(), 0);
    }

    #[test]
    fn test_inter_byte_delay_sends_byte_by_byte() {
        let mut gsm = gsm_with(GsmConfig {
            inter_byte_delay_us: 50,
            ..GsmConfig::default()
        });
        let mut timer = MockTimer::new();
        gsm.send_command(&mut timer, "AT").unwrap();

        assert_eq!(gsm.uart_mut().tx_buffer(), b"AT\r\n");
        assert_eq!(gsm.uart_mut().write_calls(), 4);
        assert_eq!(timer.now_us(), 200);
    }

    #[test]
    fn test_wait_response_ok() {
        let mut gsm = gsm();
        let mut timer = MockTimer::new();
        gsm.send_command(&mut timer, "AT+CSQ").unwrap();
        gsm.uart_mut().inject_rx_data(b"\r\n+CSQ: 18,0\r\n\r\nOK\r\n");

        gsm.wait_response(&mut timer).unwrap();
        assert!(gsm.response().starts_with(b"\r\n+CSQ: 18,0"));
    }

    #[test]
    fn test_wait_response_error_variants() {
        let mut gsm = gsm();
        let mut timer = MockTimer::new();

        gsm.uart_mut().inject_rx_data(b"\r\nERROR\r\n");
        assert_eq!(gsm.wait_response(&mut timer), Err(CommandError::Rejected));

        gsm.send_command(&mut timer, "AT+CPIN?").unwrap();
        gsm.uart_mut().inject_rx_data(b"\r\n+CME ERROR: 10\r\n");
        assert_eq!(gsm.wait_response(&mut timer), Err(CommandError::Rejected));
    }

    #[test]
    fn test_result_code_split_across_full_buffer() {
        let mut gsm = gsm();
        let mut timer = MockTimer::new();
        gsm.send_command(&mut timer, "AT+COPS=?").unwrap();

        let mut reply = std::vec![b'x'; RESPONSE_CAPACITY - 3];
        reply.extend_from_slice(b"\r\nOK\r\n");
        gsm.uart_mut().inject_rx_data(&reply);

        assert_eq!(gsm.wait_response(&mut timer), Ok(()));
        assert!(gsm.response().len() <= RESPONSE_CAPACITY);
        assert!(gsm.response().ends_with(b"xx\r\nOK\r\n"));
    }

    #[test]
    fn test_error_text_inside_a_line_is_not_a_result_code() {
        let mut gsm = gsm();
        let mut timer = MockTimer::new();
        gsm.send_command(&mut timer, "AT+CMGR=1").unwrap();
        gsm.uart_mut()
            .inject_rx_data(b"\r\n+CMGR: \"REC READ\"\r\nNO ERROR HERE\r\n\r\nOK\r\n");

        assert_eq!(gsm.wait_response(&mut timer), Ok(()));

        gsm.send_command(&mut timer, "AT+CMGS=1").unwrap();
        gsm.uart_mut().inject_rx_data(b"\r\n+CMS ERROR: 500\r\n");
        assert_eq!(gsm.wait_response(&mut timer), Err(CommandError::Rejected));
    }

    #[test]
    fn test_wait_response_times_out_after_budget() {
        let config = GsmConfig {
            max_polls: 5,
            poll_interval_ms: 20,
            ..GsmConfig::default()
        };
        let mut gsm = gsm_with(config);
        let mut timer = MockTimer::new();

        assert_eq!(gsm.wait_response(&mut timer), Err(CommandError::Timeout));
        assert_eq!(timer.now_ms(), 100);
    }

    /// Modem stand-in that answers each transmitted line with the next
    /// scripted reply
    struct ScriptedModem {
        tx: std::vec::Vec<u8>,
        rx: std::collections::VecDeque<u8>,
        replies: std::collections::VecDeque<&'static [u8]>,
    }

    impl ScriptedModem {
        fn new(replies: &[&'static [u8]]) -> Self {
            Self {
                tx: std::vec::Vec::new(),
                rx: std::collections::VecDeque::new(),
                replies: replies.iter().copied().collect(),
            }
        }
    }

    impl UartInterface for ScriptedModem {
        fn write(&mut self, data: &[u8]) -> Result<usize> {
            for &b in data {
                self.tx.push(b);
                if b == b'\n' || b == CTRL_Z {
                    if let Some(reply) = self.replies.pop_front() {
                        self.rx.extend(reply.iter().copied());
                    }
                }
            }
            Ok(data.len())
        }

        fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
            let n = buffer.len().min(self.rx.len());
            for slot in buffer.iter_mut().take(n) {
                *slot = self.rx.pop_front().unwrap_or(0);
            }
            Ok(n)
        }

        fn set_baud_rate(&mut self, _baud: u32) -> Result<()> {
            Ok(())
        }

        fn available(&self) -> bool {
            !self.rx.is_empty()
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }
    }

    fn scripted(replies: &[&'static [u8]]) -> Gsm<ScriptedModem, MockGpio> {
        Gsm::new(
            ScriptedModem::new(replies),
            MockGpio::new_output(),
            MockGpio::new_output(),
            MockGpio::new_input(),
            MockGpio::new_input(),
            &GsmConfig::default(),
        )
    }

    #[test]
    fn test_send_sms_text() {
        let mut gsm = scripted(&[b"\r\nOK\r\n", b"\r\n> ", b"\r\n+CMGS: 12\r\n\r\nOK\r\n"]);
        let mut timer = MockTimer::new();

        gsm.send_sms_text(&mut timer, "+15550100", "hello").unwrap();

        let mut expected = b"AT+CMGF=1\r\nAT+CMGS=\"+15550100\"\r\nhello".to_vec();
        expected.push(CTRL_Z);
        assert_eq!(gsm.uart_mut().tx, expected);
        assert!(gsm.response().starts_with(b"\r\n+CMGS: 12"));
    }

    #[test]
    fn test_send_sms_text_rejected_by_modem() {
        let mut gsm = scripted(&[b"\r\nOK\r\n", b"\r\n+CMS ERROR: 304\r\n"]);
        let mut timer = MockTimer::new();

        assert_eq!(
            gsm.send_sms_text(&mut timer, "+15550100", "hello"),
            Err(CommandError::Rejected)
        );
        assert!(!gsm.uart_mut().tx.ends_with(b"hello"));
    }

    #[test]
    fn test_send_sms_text_too_long_sends_nothing() {
        let mut gsm = gsm();
        let mut timer = MockTimer::new();
        let text = [b'x'; SMS_MAX_LEN + 1];
        let text = core::str::from_utf8(&text).unwrap();

        assert_eq!(
            gsm.send_sms_text(&mut timer, "+15550100", text),
            Err(CommandError::Overflow)
        );
        assert!(gsm.uart_mut().tx_buffer().is_empty());
    }

    #[test]
    fn test_power_on_pulses_key() {
        let mut gsm = gsm();
        let mut timer = MockTimer::new();
        gsm.power_on(&mut timer).unwrap();

        assert!(!gsm.pwr.read());
        assert_eq!(gsm.pwr.write_count(), 2);
        assert_eq!(timer.now_ms(), 1200);
    }

    #[test]
    fn test_status_lines_read_twice_agree() {
        let mut gsm = gsm();
        assert!(!gsm.ring_indicator());
        assert!(!gsm.ring_indicator());
        assert!(!gsm.clear_to_send());

        gsm.ri.set_input_state(false);
        assert!(gsm.ring_indicator());
        assert!(gsm.ring_indicator());

        gsm.set_rts(true).unwrap();
        assert!(gsm.rts.read());
    }

    #[test]
    fn test_init_default_config_fails() {
        let mut platform = MockPlatform::new();
        let result = Gsm::init(&mut platform, &GsmConfig::default());
        assert!(matches!(
            result,
            Err(PlatformError::Uart(UartError::InvalidPins))
        ));
    }

    #[test]
    fn test_init_mapped() {
        let mut platform = MockPlatform::new();
        let mut config = GsmConfig::default();
        config.map_mikrobus(&platform.mikrobus(MikrobusSocket::One));

        let mut gsm = Gsm::init(&mut platform, &config).unwrap();
        assert_eq!(gsm.uart_mut().baud_rate(), 9600);
        assert!(!gsm.pwr.read());
        assert_eq!(gsm.name(), "GSM Click");
    }
}
