//! palette-dither: palette quantization and error-diffusion dithering
//!
//! This library reduces full-color raster images to a small, fixed color
//! palette while preserving perceived tone through Floyd-Steinberg error
//! diffusion. It is the algorithmic core of a retro video filter: every
//! frame of a video is pushed through [`dither_image`] (or a reusable
//! [`Ditherer`]) and comes out using only palette colors.
//!
//! # Quick Start
//!
//! ```
//! use palette_dither::{Ditherer, Palette};
//!
//! let palette = Palette::from_hex(&["#000000", "#FFFFFF"]).unwrap();
//! let ditherer = Ditherer::new(palette).intensity(1.0);
//!
//! // A 2x2 mid-gray image, 3 bytes per pixel, row-major.
//! let pixels = vec![128u8; 2 * 2 * 3];
//! let result = ditherer.dither(&pixels, 2, 2).unwrap();
//!
//! assert_eq!(result.len(), pixels.len());
//! ```
//!
//! # Algorithm
//!
//! The engine is a single raster scan (top-to-bottom, left-to-right) over an
//! owned working buffer:
//!
//! 1. Read the current pixel from the working buffer. Pixels ahead of the
//!    scan cursor may already carry error diffused from earlier pixels.
//! 2. Match it to the closest palette entry under squared Euclidean RGB
//!    distance ([`Palette::nearest`]). Ties go to the first entry in palette
//!    order, so output is fully deterministic.
//! 3. Commit the matched color to the output buffer.
//! 4. Scale the per-channel quantization error by the intensity factor and
//!    spread it to the four forward neighbors with the classic
//!    Floyd-Steinberg weights (7/16, 3/16, 5/16, 1/16). Neighbors outside
//!    the image are skipped; each updated channel is clamped to 0..=255 at
//!    the moment it is written.
//!
//! The diffusion step gives the pass a strict sequential dependency between
//! pixels of one frame. Frames, on the other hand, are completely
//! independent of each other: the pass is a pure function of its inputs, so
//! callers are free to dither many frames in parallel as long as each task
//! owns its own buffers.
//!
//! # Intensity
//!
//! The intensity factor linearly scales every diffused error term. 0.0 turns
//! diffusion off entirely (plain per-pixel quantization), 1.0 is the full
//! Floyd-Steinberg kernel. Values outside that range are deliberately not
//! clamped; they over- or under-drive the diffusion, which can be used as a
//! stylistic control.
//!
//! # Palettes
//!
//! [`Palette`] guarantees at construction time that it is non-empty,
//! duplicate-free, and built from well-formed colors, so the hot per-pixel
//! path never needs to re-validate. A registry of named presets in the style
//! of limited retro hardware palettes is available via [`presets`].

pub mod color;
pub mod dither;
pub mod palette;
pub mod presets;


pub use color::{ParseColorError, Rgb};
pub use dither::{dither_image, DitherError, Ditherer, Kernel, FLOYD_STEINBERG};
pub use palette::{Palette, PaletteError};
