//! SPI bus abstractions
//!
//! Provides the SPI master operations used by serial display controllers.
//! Chip-select is driven by the display driver itself, so implementations
//! only move bytes.

/// SPI bus master
pub trait SpiBus {
    /// Error type for SPI operations
    type Error;

    /// Transfer data (simultaneous read/write)
    ///
    /// Writes data from `write` buffer while reading into `read` buffer.
    /// Both buffers must be the same length.
    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error>;

    /// Write data without reading
    ///
    /// Blocks until every byte has left the controller.
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Write a single byte
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.write(&[byte])
    }
}

impl<T: SpiBus + ?Sized> SpiBus for &mut T {
    type Error = T::Error;

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        T::transfer(self, read, write)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        T::write(self, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        buf: [u8; 4],
        len: usize,
    }

    impl SpiBus for Recorder {
        type Error = ();

        fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), ()> {
            read.copy_from_slice(write);
            self.write(write)
        }

        fn write(&mut self, data: &[u8]) -> Result<(), ()> {
            let end = self.len + data.len();
            self.buf.get_mut(self.len..end).ok_or(())?.copy_from_slice(data);
            self.len = end;
            Ok(())
        }
    }

    fn frame<S: SpiBus>(mut spi: S) -> Result<(), S::Error> {
        spi.write_byte(0x21)?;
        spi.write(&[0x80, 0x40])
    }

    #[test]
    fn test_write_byte_through_reference() {
        let mut spi = Recorder::default();
        frame(&mut spi).unwrap();
        assert_eq!(&spi.buf[..spi.len], [0x21, 0x80, 0x40]);
        assert_eq!(frame(&mut spi), Err(()));
    }
}
