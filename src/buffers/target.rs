use crate::Error;

/// A buffer provided by the application, together with the buffer length it declared for it.
///
/// The declared length is given in elements of `T`, i.e. bytes for narrow text and binary data and
/// code units for wide text. ODBC allows the application to pass a length without any memory
/// behind it, in order to only learn the length of a value. Conversely a declared length of zero
/// means nothing is written, even if memory is available.
#[derive(Debug)]
pub struct TargetBuffer<'a, T> {
    buffer: Option<&'a mut [T]>,
    declared: usize,
}

impl<'a, T> TargetBuffer<'a, T> {
    /// Validates the buffer length passed by the application. A declared length larger than
    /// `buffer` is clamped to the length of `buffer`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBufferLength`] if `buffer_length` is negative.
    pub fn new(buffer: Option<&'a mut [T]>, buffer_length: isize) -> Result<Self, Error> {
        let declared = usize::try_from(buffer_length).map_err(|_| Error::InvalidBufferLength {
            length: buffer_length,
        })?;
        let declared = match &buffer {
            Some(buffer) => declared.min(buffer.len()),
            None => declared,
        };
        Ok(TargetBuffer { buffer, declared })
    }

    /// Use all of `buffer`.
    pub fn from_slice(buffer: &'a mut [T]) -> Self {
        let declared = buffer.len();
        TargetBuffer {
            buffer: Some(buffer),
            declared,
        }
    }

    /// Neither memory, nor a length. Only the indicator is going to be reported.
    pub fn length_only() -> Self {
        TargetBuffer {
            buffer: None,
            declared: 0,
        }
    }

    /// Buffer length declared by the application, in elements of `T`.
    pub fn declared(&self) -> usize {
        self.declared
    }

    /// The first [`Self::declared`] elements of the buffer. `None` if there is no memory or if the
    /// declared length is zero.
    pub fn slice_mut(&mut self) -> Option<&mut [T]> {
        let declared = self.declared;
        self.buffer
            .as_deref_mut()
            .filter(|_| declared > 0)
            .map(|buffer| &mut buffer[..declared])
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::TargetBuffer;

    #[test]
    fn negative_buffer_length() {
        let mut buf = [0u8; 4];
        let result = TargetBuffer::new(Some(&mut buf[..]), -2);
        assert_eq!(Error::InvalidBufferLength { length: -2 }, result.unwrap_err());
    }

    #[test]
    fn declared_length_is_clamped_to_buffer() {
        let mut buf = [0u8; 4];
        let mut target = TargetBuffer::new(Some(&mut buf[..]), 100).unwrap();
        assert_eq!(4, target.declared());
        assert_eq!(4, target.slice_mut().unwrap().len());
    }

    #[test]
    fn zero_length_hides_memory() {
        let mut buf = [0u8; 4];
        let mut target = TargetBuffer::new(Some(&mut buf[..]), 0).unwrap();
        assert!(target.slice_mut().is_none());
    }

    #[test]
    fn length_without_memory() {
        let mut target = TargetBuffer::<u8>::new(None, 10).unwrap();
        assert_eq!(10, target.declared());
        assert!(target.slice_mut().is_none());
    }
}
