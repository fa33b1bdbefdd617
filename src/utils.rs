use crate::error::{Error, Result};

#[inline(always)]
#[cold]
pub const fn cold() {}

#[inline(always)]
pub const fn unlikely(b: bool) -> bool {
    if b {
        cold();
    }
    b
}

/// Write cursor over an output slice; every write consumes the written prefix.
pub struct BytesMut<'a>(&'a mut [u8]);

impl<'a> BytesMut<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self(buf)
    }

    #[inline]
    pub fn write_one(self, v: u8) -> Self {
        if let Some((first, tail)) = self.0.split_first_mut() {
            *first = v;
            Self(tail)
        } else {
            cold();
            panic!();
        }
    }

    #[inline]
    pub fn write_many(self, v: &[u8]) -> Self {
        let (head, tail) = self.0.split_at_mut(v.len());
        head.copy_from_slice(v);
        Self(tail)
    }

    /// Number of bytes still available.
    #[inline]
    pub const fn len(&self) -> usize {
        self.0.len()
    }
}

/// Read cursor over an input slice.
pub struct Bytes<'a>(&'a [u8]);

impl<'a> Bytes<'a> {
    pub const fn new(buf: &'a [u8]) -> Self {
        Self(buf)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn read_one(&mut self) -> Result<u8> {
        if let Some((&v, tail)) = self.0.split_first() {
            self.0 = tail;
            Ok(v)
        } else {
            cold();
            Err(Error::UnexpectedBufferEnd)
        }
    }

    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        if unlikely(self.0.len() < N) {
            return Err(Error::UnexpectedBufferEnd);
        }
        let (head, tail) = self.0.split_at(N);
        self.0 = tail;
        let mut out = [0; N];
        out.copy_from_slice(head);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_read_past_end() {
        let mut bytes = Bytes::new(&[1, 2, 3]);
        assert_eq!(bytes.read_one(), Ok(1));
        assert_eq!(bytes.read_array::<3>(), Err(Error::UnexpectedBufferEnd));
        assert_eq!(bytes.read_array::<2>(), Ok([2, 3]));
        assert!(bytes.is_empty());
        assert_eq!(bytes.read_one(), Err(Error::UnexpectedBufferEnd));
    }

    #[test]
    fn test_bytes_mut_tracks_remaining() {
        let mut out = [0_u8; 4];
        let buf = BytesMut::new(&mut out).write_one(7).write_many(&[8, 9]);
        assert_eq!(buf.len(), 1);
        assert_eq!(out, [7, 8, 9, 0]);
    }
}
