//! GSM Click command/response walk-through on the mock platform
//!
//! The mock modem's answers are injected by hand between commands.
//!
//! `cargo run --example gsm_status`

use click_drivers::devices::gsm::{Gsm, GsmConfig};
use click_drivers::devices::CommandError;
use click_drivers::platform::mock::MockPlatform;
use click_drivers::platform::traits::{MikrobusSocket, Platform};

fn main() -> Result<(), CommandError> {
    let mut platform = MockPlatform::new();

    let mut config = GsmConfig::default();
    config.map_mikrobus(&platform.mikrobus(MikrobusSocket::One));
    config.inter_byte_delay_us = 100;
    let mut gsm = Gsm::init(&mut platform, &config)?;

    gsm.power_on(platform.timer_mut())?;

    gsm.send_command(platform.timer_mut(), "AT")?;
    gsm.uart_mut().inject_rx_data(b"AT\r\r\nOK\r\n");
    gsm.wait_response(platform.timer_mut())?;
    println!("modem alive");

    gsm.send_command(platform.timer_mut(), "AT+CSQ")?;
    gsm.uart_mut().inject_rx_data(b"\r\n+CSQ: 21,0\r\n\r\nOK\r\n");
    gsm.wait_response(platform.timer_mut())?;
    let reply = String::from_utf8_lossy(gsm.response()).into_owned();
    println!("signal: {}", reply.trim());

    gsm.set_sim_apn(platform.timer_mut(), "internet")?;
    gsm.uart_mut().inject_rx_data(b"\r\nERROR\r\n");
    match gsm.wait_response(platform.timer_mut()) {
        Err(CommandError::Rejected) => println!("APN rejected by modem"),
        other => println!("APN result: {:?}", other),
    }

    // Over-long input is refused before anything reaches the UART
    let long = "A".repeat(300);
    let sent_before = gsm.uart_mut().tx_buffer().len();
    assert_eq!(
        gsm.send_command(platform.timer_mut(), &long),
        Err(CommandError::Overflow)
    );
    assert_eq!(gsm.uart_mut().tx_buffer().len(), sent_before);

    Ok(())
}
