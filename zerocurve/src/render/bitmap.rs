/// Classification of a single pixel
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Pixel {
    /// The curve does not pass through this pixel
    Empty = 0,
    /// The curve may pass through this pixel
    Curve = 1,
    /// The pixel has not been classified, e.g. because evaluation faulted
    #[default]
    Incomplete = 2,
}

impl Pixel {
    /// RGB colors for each pixel kind, indexed by [`Pixel::index`]
    pub const PALETTE: [[u8; 3]; 3] = [
        [0xFF, 0xFF, 0xFF], // white
        [0x00, 0x00, 0x00], // black
        [0xFF, 0xFF, 0x00], // yellow
    ];

    /// Returns the palette index of this pixel
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Returns the palette color of this pixel
    pub fn rgb(self) -> [u8; 3] {
        Self::PALETTE[self as usize]
    }
}

/// Indexed-color image produced by the rasterizer
///
/// Pixels are stored in row-major order, starting with row 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    data: Vec<Pixel>,
}

impl Bitmap {
    /// Builds a new bitmap, with every pixel [`Incomplete`](Pixel::Incomplete)
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![Pixel::Incomplete; width * height],
        }
    }

    /// Returns the image width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the pixel at column `x`, row `y`
    ///
    /// # Panics
    /// If the position is out of bounds
    pub fn get(&self, x: usize, y: usize) -> Pixel {
        assert!(x < self.width && y < self.height);
        self.data[y * self.width + x]
    }

    /// Returns all pixels, in row-major order
    pub fn pixels(&self) -> &[Pixel] {
        &self.data
    }

    /// Returns all pixels mutably, for the rasterizer to fill in
    pub(crate) fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.data
    }

    /// Counts pixels of the given kind
    pub fn count(&self, p: Pixel) -> usize {
        self.data.iter().filter(|q| **q == p).count()
    }

    /// Returns palette indices, one byte per pixel
    pub fn to_indices(&self) -> Vec<u8> {
        self.data.iter().map(|p| p.index()).collect()
    }

    /// Expands the image through the palette into packed RGB bytes
    pub fn to_rgb(&self) -> Vec<u8> {
        self.data.iter().flat_map(|p| p.rgb()).collect()
    }

    /// Renders the image as text, with `X` for curve pixels, `.` for empty
    /// pixels, and `?` for incomplete pixels
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.data.chunks_exact(self.width.max(1)) {
            for p in row {
                out.push(match p {
                    Pixel::Empty => '.',
                    Pixel::Curve => 'X',
                    Pixel::Incomplete => '?',
                });
            }
            out.push('\n');
        }
        out
    }
}
