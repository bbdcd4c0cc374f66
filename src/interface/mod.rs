pub mod i2c;

/// Byte-level transport to the sensor
///
/// The device address is part of the implementation, not the call: it
/// is fixed when the interface is built and every transaction targets
/// it. No timing, retry or arbitration guarantees are made here; those
/// belong to the platform bus implementation, which also bounds how
/// long a transaction may block.
pub trait BusInterface {
    type Error;

    /// Send the given bytes to the device
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
    /// Fill `buffer` with bytes read from the device
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error>;
}
