use embedded_hal::blocking::i2c::{Read, Write};

use crate::interface::BusInterface;
use crate::Address;

/// I²C implementation of [`BusInterface`]
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C, CommE> I2cInterface<I2C>
where
    I2C: Write<Error = CommE> + Read<Error = CommE>,
{
    /// Create a new BH1750 I2C interface
    pub fn new(i2c: I2C, address: Address) -> Self {
        Self {
            i2c,
            address: address as u8,
        }
    }

    /// Give the bus back
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, CommE> BusInterface for I2cInterface<I2C>
where
    I2C: Write<Error = CommE> + Read<Error = CommE>,
{
    type Error = CommE;

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(self.address, bytes)
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.read(self.address, buffer)
    }
}
