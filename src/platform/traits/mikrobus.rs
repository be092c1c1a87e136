//! MikroBUS socket pin mapping
//!
//! A Click board plugs into a MikroBUS socket whose roles (AN, RST, CS, ...)
//! are wired to MCU pins by the board. Drivers keep logical pin names in their
//! config; the platform resolves them when the bus or GPIO is created.

/// Logical pin identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinName {
    /// No pin assigned
    #[default]
    Unconnected,
    /// MCU GPIO number
    Gpio(u8),
}

impl PinName {
    /// Whether a pin has been assigned
    pub const fn is_connected(self) -> bool {
        matches!(self, PinName::Gpio(_))
    }

    /// GPIO number, if assigned
    pub const fn gpio(self) -> Option<u8> {
        match self {
            PinName::Gpio(n) => Some(n),
            PinName::Unconnected => None,
        }
    }
}

/// MikroBUS socket on the host board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MikrobusSocket {
    /// Socket 1
    One,
    /// Socket 2
    Two,
    /// Socket 3
    Three,
    /// Socket 4
    Four,
}

/// Pin assignment of one MikroBUS socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MikrobusPinout {
    /// Analog input
    pub an: PinName,
    /// Reset
    pub rst: PinName,
    /// SPI chip select
    pub cs: PinName,
    /// SPI clock
    pub sck: PinName,
    /// SPI data in (MCU side)
    pub miso: PinName,
    /// SPI data out (MCU side)
    pub mosi: PinName,
    /// PWM output
    pub pwm: PinName,
    /// Interrupt
    pub int: PinName,
    /// UART receive (MCU side)
    pub rx: PinName,
    /// UART transmit (MCU side)
    pub tx: PinName,
    /// I2C clock
    pub scl: PinName,
    /// I2C data
    pub sda: PinName,
}

/// Pinout validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinoutError {
    /// Same GPIO assigned to more than one role
    DuplicatePin(u8),
}

impl MikrobusPinout {
    /// Pinout with every role unconnected
    pub const fn unconnected() -> Self {
        Self {
            an: PinName::Unconnected,
            rst: PinName::Unconnected,
            cs: PinName::Unconnected,
            sck: PinName::Unconnected,
            miso: PinName::Unconnected,
            mosi: PinName::Unconnected,
            pwm: PinName::Unconnected,
            int: PinName::Unconnected,
            rx: PinName::Unconnected,
            tx: PinName::Unconnected,
            scl: PinName::Unconnected,
            sda: PinName::Unconnected,
        }
    }

    fn roles(&self) -> [PinName; 12] {
        [
            self.an, self.rst, self.cs, self.sck, self.miso, self.mosi, self.pwm, self.int,
            self.rx, self.tx, self.scl, self.sda,
        ]
    }

    /// Check that no GPIO is wired to two roles
    ///
    /// # Errors
    ///
    /// Returns `PinoutError::DuplicatePin` with the first repeated GPIO.
    pub fn validate(&self) -> Result<(), PinoutError> {
        use heapless::FnvIndexSet;

        let mut used = FnvIndexSet::<u8, 16>::new();
        for gpio in self.roles().iter().filter_map(|p| p.gpio()) {
            if !used.insert(gpio).unwrap_or(false) {
                return Err(PinoutError::DuplicatePin(gpio));
            }
        }
        Ok(())
    }
}
