mod common;

use cfg_if::cfg_if;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::Geometric;

use qoi::{decode_to_vec, encode_max_len, encode_to_vec, Channels};

use self::common::{hash, to_rgba};

cfg_if! {
    if #[cfg(debug_assertions)] {
        const N_PIXELS_TOTAL: usize = 2_000_000;
    } else {
        const N_PIXELS_TOTAL: usize = 20_000_000;
    }
}

struct GenState<const N: usize> {
    index: [[u8; N]; 64],
    pixels: Vec<u8>,
    prev: [u8; N],
    len: usize,
}

impl<const N: usize> GenState<N> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: [[0; N]; 64],
            pixels: Vec::with_capacity(capacity * N),
            prev: Self::start(),
            len: 0,
        }
    }

    pub fn write(&mut self, px: [u8; N]) {
        self.index[hash(px) as usize] = px;
        self.pixels.extend_from_slice(&px);
        self.prev = px;
        self.len += 1;
    }

    pub fn pick_from_index(&self, rng: &mut impl Rng) -> [u8; N] {
        self.index[rng.random_range(0_usize..64)]
    }

    /// The pixel both sides start from before anything has been written.
    pub fn start() -> [u8; N] {
        let mut px = [0; N];
        if let Some(a) = px.get_mut(3) {
            *a = 0xff;
        }
        px
    }
}

/// Random mix of pixel kinds, weighted so that every chunk type shows up.
struct ImageGen {
    p_new: f64,
    p_index: f64,
    p_repeat: f64,
    p_diff: f64,
    p_luma: f64,
    repeat: Geometric,
}

impl ImageGen {
    pub fn new_random(rng: &mut impl Rng) -> Self {
        let p = [0; 6].map(|_| rng.random::<f64>());
        let t = p.iter().sum::<f64>();
        let p_stop = rng.random_range(0.005..0.5);
        Self {
            p_new: p[0] / t,
            p_index: p[1] / t,
            p_repeat: p[2] / t,
            p_diff: p[3] / t,
            p_luma: p[4] / t,
            repeat: Geometric::new(p_stop).unwrap(),
        }
    }

    pub fn generate(&self, rng: &mut impl Rng, channels: usize, min_len: usize) -> Vec<u8> {
        match channels {
            3 => self.generate_const::<_, 3>(rng, min_len),
            4 => self.generate_const::<_, 4>(rng, min_len),
            _ => panic!("unsupported channel count: {channels}"),
        }
    }

    fn generate_const<R: Rng, const N: usize>(&self, rng: &mut R, min_len: usize) -> Vec<u8> {
        let mut s = GenState::<N>::with_capacity(min_len);

        while s.len < min_len {
            let mut p = rng.random_range(0.0..1.0);

            if p < self.p_new {
                s.write([0; N].map(|_| rng.random()));
                continue;
            }
            p -= self.p_new;

            if p < self.p_index {
                let px = s.pick_from_index(rng);
                s.write(px);
                continue;
            }
            p -= self.p_index;

            if p < self.p_repeat {
                let px = s.prev;
                let n_repeat = 1 + rng.sample(&self.repeat).min(200);
                for _ in 0..n_repeat {
                    s.write(px);
                }
                continue;
            }
            p -= self.p_repeat;

            if p < self.p_diff {
                let mut px = s.prev;
                for c in &mut px[..3] {
                    *c = c.wrapping_add(rng.random_range(0_u8..4).wrapping_sub(2));
                }
                s.write(px);
                continue;
            }
            p -= self.p_diff;

            if p < self.p_luma {
                let mut px = s.prev;
                let vg = rng.random_range(0_u8..64).wrapping_sub(32);
                let vr = rng.random_range(0_u8..16).wrapping_sub(8).wrapping_add(vg);
                let vb = rng.random_range(0_u8..16).wrapping_sub(8).wrapping_add(vg);
                px[0] = px[0].wrapping_add(vr);
                px[1] = px[1].wrapping_add(vg);
                px[2] = px[2].wrapping_add(vb);
                s.write(px);
                continue;
            }

            let mut px = s.prev;
            if let Some(a) = px.get_mut(3) {
                *a = a.wrapping_add(rng.random_range(1_u8..=255));
            }
            s.write(px);
        }

        s.pixels
    }
}

#[test]
fn test_generated() {
    let mut rng = StdRng::seed_from_u64(0);

    let mut n_pixels = 0;
    while n_pixels < N_PIXELS_TOTAL {
        let min_len = rng.random_range(1..=5000);
        let channels = rng.random_range(3..=4_usize);
        let gen = ImageGen::new_random(&mut rng);
        let img = gen.generate(&mut rng, channels, min_len);
        let size = img.len() / channels;

        let encoded = encode_to_vec(&img, size as _, 1, channels as _).unwrap();
        assert!(encoded.len() <= encode_max_len(size as _, 1, channels as u8));

        let (header, decoded) = decode_to_vec(&encoded).unwrap();
        assert_eq!((header.width, header.height), (size as u32, 1));
        assert_eq!(header.channels, Channels::try_from(channels as u8).unwrap());
        let expected = to_rgba(&img, channels);
        assert_eq!(&decoded, &expected, "roundtrip fail");

        // opaque RGB and its RGBA expansion share the same chunk body
        let reencoded = encode_to_vec(&decoded, size as _, 1, 4).unwrap();
        assert_eq!(&encoded[14..], &reencoded[14..], "re-encoding is not stable");

        n_pixels += size;
    }
}
