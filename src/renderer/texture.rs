use std::fmt;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};
use thiserror::Error;

/// Checker image compiled into the binary, used when no file is configured.
pub const BUILTIN_TEXTURE: &[u8] = include_bytes!("../../assets/texture.png");

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image has no pixels")]
    Empty,

    #[error("texture loader is not running")]
    LoaderStopped,
}

/// RGBA8 pixels ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTexture {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl DecodedTexture {
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![255; 4],
        }
    }
}

pub fn decode_texture(bytes: &[u8]) -> Result<DecodedTexture, TextureError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(TextureError::Empty);
    }
    Ok(DecodedTexture {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

pub fn load_texture(path: &Path) -> Result<DecodedTexture, TextureError> {
    let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_texture(&bytes)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureSource {
    Builtin,
    File(PathBuf),
}

impl TextureSource {
    /// Blank text selects the built-in image.
    pub fn from_text(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            TextureSource::Builtin
        } else {
            TextureSource::File(PathBuf::from(text))
        }
    }

    pub fn decode(&self) -> Result<DecodedTexture, TextureError> {
        match self {
            TextureSource::Builtin => decode_texture(BUILTIN_TEXTURE),
            TextureSource::File(path) => load_texture(path),
        }
    }
}

impl fmt::Display for TextureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureSource::Builtin => f.write_str("built-in checker"),
            TextureSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl GpuTexture {
    pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue, decoded: &DecodedTexture) -> Self {
        let size = wgpu::Extent3d {
            width: decoded.width,
            height: decoded.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Surface Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &decoded.pixels,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * decoded.width),
                rows_per_image: Some(decoded.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}

pub enum TextureCommand {
    Load(TextureSource),
    Stop,
}

pub enum TextureResult {
    Loaded {
        source: TextureSource,
        texture: DecodedTexture,
    },
    Failed {
        source: TextureSource,
        message: String,
    },
}

/// Decodes texture images off the event loop thread.
///
/// `wake` runs once after each result is queued, so the owner can poll
/// `try_recv_result` without spinning. Results queue without bound; the
/// thread never blocks on an owner that stopped draining.
pub struct TextureLoader {
    tx_cmd: Sender<TextureCommand>,
    rx_result: Receiver<TextureResult>,
    thread_handle: Option<JoinHandle<()>>,
}

impl TextureLoader {
    pub fn new(wake: impl Fn() + Send + 'static) -> Self {
        let (tx_cmd, rx_cmd) = channel::unbounded::<TextureCommand>();
        let (tx_result, rx_result) = channel::unbounded::<TextureResult>();

        let thread_handle = thread::Builder::new()
            .name("texture-loader".into())
            .spawn(move || loader_thread(rx_cmd, tx_result, wake))
            .map_err(|err| log::error!("failed to spawn texture loader: {err}"))
            .ok();

        Self {
            tx_cmd,
            rx_result,
            thread_handle,
        }
    }

    pub fn load(&self, source: TextureSource) -> Result<(), TextureError> {
        self.tx_cmd
            .send(TextureCommand::Load(source))
            .map_err(|_| TextureError::LoaderStopped)
    }

    pub fn try_recv_result(&self) -> Option<TextureResult> {
        self.rx_result.try_recv().ok()
    }
}

impl Drop for TextureLoader {
    fn drop(&mut self) {
        let _ = self.tx_cmd.send(TextureCommand::Stop);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

fn loader_thread(
    rx_cmd: Receiver<TextureCommand>,
    tx_result: Sender<TextureResult>,
    wake: impl Fn(),
) {
    while let Ok(cmd) = rx_cmd.recv() {
        let source = match cmd {
            TextureCommand::Load(source) => source,
            TextureCommand::Stop => return,
        };

        let result = match source.decode() {
            Ok(texture) => {
                log::info!("decoded texture {source} ({}x{})", texture.width, texture.height);
                TextureResult::Loaded { source, texture }
            }
            Err(err) => {
                log::warn!("texture {source} unavailable: {err}");
                TextureResult::Failed {
                    source,
                    message: err.to_string(),
                }
            }
        };

        if tx_result.send(result).is_err() {
            return;
        }
        wake();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::time::Duration;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([x as u8 * 40, y as u8 * 40, 7, 255])
        });
        let mut bytes = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let decoded = decode_texture(&png_bytes(3, 2)).unwrap();
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(decoded.pixels.len(), 3 * 2 * 4);
        // row 1, column 2
        let offset = (3 + 2) * 4;
        assert_eq!(&decoded.pixels[offset..offset + 4], &[80, 40, 7, 255]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_texture(b"definitely not an image").unwrap_err();
        assert!(matches!(err, TextureError::Decode(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_texture(Path::new("/nonexistent/texture.png")).unwrap_err();
        assert!(matches!(err, TextureError::Io { .. }));
    }

    fn wake_counter() -> (Receiver<()>, impl Fn() + Send + 'static) {
        let (tx_wake, rx_wake) = channel::unbounded();
        (rx_wake, move || {
            let _ = tx_wake.send(());
        })
    }

    #[test]
    fn test_builtin_texture_decodes() {
        let decoded = TextureSource::Builtin.decode().unwrap();
        assert_eq!((decoded.width, decoded.height), (256, 256));
        assert_eq!(decoded.pixels.len(), 256 * 256 * 4);
        assert!(decoded.pixels.chunks(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_source_from_text() {
        assert_eq!(TextureSource::from_text("  "), TextureSource::Builtin);
        assert_eq!(
            TextureSource::from_text(" wood.jpg "),
            TextureSource::File(PathBuf::from("wood.jpg"))
        );
    }

    #[test]
    fn test_loader_reports_and_wakes_once_per_request() {
        let (rx_wake, wake) = wake_counter();
        let loader = TextureLoader::new(wake);

        let path = std::env::temp_dir().join(format!("twisted-torus-{}.png", std::process::id()));
        std::fs::write(&path, png_bytes(4, 4)).unwrap();

        loader.load(TextureSource::File(path.clone())).unwrap();
        rx_wake.recv_timeout(Duration::from_secs(10)).unwrap();
        match loader.try_recv_result() {
            Some(TextureResult::Loaded { texture, .. }) => assert_eq!(texture.width, 4),
            _ => panic!("expected a decoded texture"),
        }

        loader.load(TextureSource::from_text("/nonexistent/texture.png")).unwrap();
        rx_wake.recv_timeout(Duration::from_secs(10)).unwrap();
        assert!(matches!(
            loader.try_recv_result(),
            Some(TextureResult::Failed { .. })
        ));
        assert!(rx_wake.try_recv().is_err());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_back_to_back_failures_keep_their_own_message() {
        let (rx_wake, wake) = wake_counter();
        let loader = TextureLoader::new(wake);

        loader.load(TextureSource::from_text("/nonexistent/first.png")).unwrap();
        loader.load(TextureSource::from_text("/nonexistent/second.png")).unwrap();
        for _ in 0..2 {
            rx_wake.recv_timeout(Duration::from_secs(10)).unwrap();
        }

        for expected in ["first.png", "second.png"] {
            match loader.try_recv_result() {
                Some(TextureResult::Failed { source, message }) => {
                    assert!(source.to_string().ends_with(expected));
                    assert!(message.contains(expected), "{message}");
                }
                _ => panic!("expected a failure for {expected}"),
            }
        }
    }

    #[test]
    fn test_drop_with_undrained_results_does_not_block() {
        let (rx_wake, wake) = wake_counter();
        let loader = TextureLoader::new(wake);

        for _ in 0..5 {
            loader.load(TextureSource::Builtin).unwrap();
        }
        for _ in 0..5 {
            rx_wake.recv_timeout(Duration::from_secs(10)).unwrap();
        }
        drop(loader);
    }

    #[test]
    fn test_load_after_thread_exit_is_an_error() {
        let (_rx_wake, wake) = wake_counter();
        let mut loader = TextureLoader::new(wake);

        loader.tx_cmd.send(TextureCommand::Stop).unwrap();
        if let Some(handle) = loader.thread_handle.take() {
            handle.join().unwrap();
        }

        let err = loader.load(TextureSource::Builtin).unwrap_err();
        assert!(matches!(err, TextureError::LoaderStopped));
    }
}
