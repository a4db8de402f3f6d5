// chat-overlay-translator/src/ocr.rs

// ============================================================================
// MÓDULO OCR - Extração de texto da região capturada
// ============================================================================
//
// Dois motores:
// 1. Windows OCR nativo (Windows 10/11), com o pacote de idioma russo
// 2. Tesseract (CLI externo), para outras plataformas
//
// O TextExtractor junta captura + OCR e impõe o limite de tempo: o OCR roda
// numa thread à parte e, se passar do limite, é cancelado (o processo do
// tesseract é morto) e o resultado que chegar depois é descartado.
// Enquanto um OCR abandonado ainda roda, nenhum outro é iniciado.
//
// ============================================================================

use anyhow::{Context, Result};
use crossbeam_channel::bounded;
use image::DynamicImage;
use std::io::{Cursor, Read, Write};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use crate::app_state::CaptureRegion;
use crate::config::OcrConfig;
use crate::errors::CycleError;
use crate::screenshot::ScreenGrabber;

/// Motor de OCR: imagem -> texto (linhas separadas por '\n')
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, image: &DynamicImage) -> Result<String>;

    fn name(&self) -> &'static str;

    /// Interrompe o reconhecimento em andamento, se o motor souber fazer isso
    fn cancel(&self) {}
}

/// Escolhe o motor a partir do config
pub fn recognizer_from_config(config: &OcrConfig) -> Arc<dyn TextRecognizer> {
    match config.engine.to_lowercase().as_str() {
        #[cfg(windows)]
        "windows" => Arc::new(WindowsOcr::new("ru")),
        "tesseract" => Arc::new(TesseractOcr::new(&config.tesseract_path, &config.languages)),
        other => {
            warn!("⚠️  Motor de OCR '{}' não disponível, usando Tesseract", other);
            Arc::new(TesseractOcr::new(&config.tesseract_path, &config.languages))
        }
    }
}

// ============================================================================
// TEXT EXTRACTOR - captura + OCR com timeout
// ============================================================================

pub struct TextExtractor {
    grabber: Arc<dyn ScreenGrabber>,
    recognizer: Arc<dyn TextRecognizer>,
    timeout: Duration,
    /// true enquanto a thread de OCR está viva (mesmo depois do timeout)
    in_flight: Arc<AtomicBool>,
}

/// Libera o `in_flight` quando a thread de OCR termina (ou entra em pânico)
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl TextExtractor {
    pub fn new(
        grabber: Arc<dyn ScreenGrabber>,
        recognizer: Arc<dyn TextRecognizer>,
        timeout: Duration,
    ) -> Self {
        TextExtractor {
            grabber,
            recognizer,
            timeout,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Captura a região e reconhece o texto, com a falha tipada.
    ///
    /// Nunca bloqueia mais que `timeout` esperando o OCR.
    pub fn try_extract(&self, region: &CaptureRegion) -> Result<String, CycleError> {
        // Um OCR por vez: o abandonado precisa morrer antes do próximo
        if self.in_flight.swap(true, Ordering::SeqCst) {
            self.recognizer.cancel();
            return Err(CycleError::Ocr("OCR anterior ainda em execução".to_string()));
        }
        let guard = InFlightGuard(Arc::clone(&self.in_flight));

        let image = self
            .grabber
            .grab(region)
            .map_err(|e| CycleError::Capture(format!("{:#}", e)))?;

        let (sender, receiver) = bounded(1);
        let recognizer = Arc::clone(&self.recognizer);
        let started = Instant::now();

        thread::Builder::new()
            .name("ocr".to_string())
            .spawn(move || {
                let _guard = guard;
                let result = recognizer.recognize(&image);
                // Se ninguém espera mais (timeout), o envio falha e o resultado some
                let _ = sender.send(result);
            })
            .map_err(|e| CycleError::Ocr(format!("Falha ao iniciar thread de OCR: {}", e)))?;

        match receiver.recv_timeout(self.timeout) {
            Ok(Ok(text)) => {
                trace!(
                    "🔍 [{}] OCR em {:?}: {} caracteres",
                    self.recognizer.name(),
                    started.elapsed(),
                    text.chars().count()
                );
                Ok(normalize_text(&text))
            }
            Ok(Err(e)) => Err(CycleError::Ocr(format!("{:#}", e))),
            Err(_) => {
                self.recognizer.cancel();
                Err(CycleError::OcrTimeout(self.timeout))
            }
        }
    }
}

/// Remove linhas vazias e espaços nas pontas de cada linha
pub fn normalize_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Codifica a imagem como PNG em memória
fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut png_bytes: Vec<u8> = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png_bytes), image::ImageFormat::Png)
        .context("Falha ao converter imagem para PNG")?;
    Ok(png_bytes)
}

// ============================================================================
// TESSERACT (CLI)
// ============================================================================

/// Chama `tesseract stdin stdout -l <idiomas>` passando o PNG pelo stdin
pub struct TesseractOcr {
    program: String,
    languages: String,
    /// Processo em andamento, para o `cancel` conseguir matá-lo
    running: Mutex<Option<Child>>,
}

impl TesseractOcr {
    pub fn new(program: &str, languages: &str) -> Self {
        TesseractOcr {
            program: program.to_string(),
            languages: languages.to_string(),
            running: Mutex::new(None),
        }
    }

    fn running(&self) -> MutexGuard<'_, Option<Child>> {
        self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TextRecognizer for TesseractOcr {
    fn recognize(&self, image: &DynamicImage) -> Result<String> {
        let png_bytes = encode_png(image)?;

        let mut child = Command::new(&self.program)
            .args(["stdin", "stdout", "-l", &self.languages])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Falha ao executar {}", self.program))?;

        let mut stdin = child.stdin.take().context("stdin do tesseract indisponível")?;
        let mut stdout = child.stdout.take().context("stdout do tesseract indisponível")?;
        let mut stderr = child.stderr.take().context("stderr do tesseract indisponível")?;

        // A partir daqui o processo fica ao alcance do cancel()
        *self.running() = Some(child);

        let stderr_reader = thread::spawn(move || {
            let mut message = String::new();
            let _ = stderr.read_to_string(&mut message);
            message
        });

        let written = stdin.write_all(&png_bytes);
        drop(stdin);

        // Se o processo for morto, o pipe fecha e a leitura termina
        let mut text = Vec::new();
        let read = stdout.read_to_end(&mut text);
        let message = stderr_reader.join().unwrap_or_default();

        let Some(mut child) = self.running().take() else {
            anyhow::bail!("tesseract cancelado");
        };
        let status = child.wait().context("Falha ao aguardar o tesseract")?;

        if !status.success() {
            anyhow::bail!("tesseract saiu com {}: {}", status, message.trim());
        }
        written.context("Falha ao enviar imagem para o tesseract")?;
        read.context("Falha ao ler a saída do tesseract")?;

        Ok(String::from_utf8_lossy(&text).into_owned())
    }

    fn name(&self) -> &'static str {
        "Tesseract"
    }

    fn cancel(&self) {
        let Some(mut child) = self.running().take() else {
            return;
        };
        warn!("⏱️  Matando tesseract travado (pid {})", child.id());
        if let Err(e) = child.kill() {
            debug!("kill do tesseract falhou: {}", e);
        }
        let _ = child.wait();
    }
}

// ============================================================================
// WINDOWS OCR NATIVO
// ============================================================================

#[cfg(windows)]
pub use windows_engine::WindowsOcr;

#[cfg(windows)]
mod windows_engine {
    use super::{encode_png, TextRecognizer};
    use anyhow::{Context, Result};
    use image::DynamicImage;
    use windows::{
        core::HSTRING,
        Globalization::Language,
        Graphics::Imaging::BitmapDecoder,
        Media::Ocr::{OcrEngine, OcrResult},
        Storage::Streams::{DataWriter, InMemoryRandomAccessStream},
    };

    /// Windows.Media.Ocr com um idioma fixo
    pub struct WindowsOcr {
        language_tag: String,
    }

    impl WindowsOcr {
        pub fn new(language_tag: &str) -> Self {
            WindowsOcr {
                language_tag: language_tag.to_string(),
            }
        }

        /// Engine no idioma pedido; sem o pacote instalado, usa o perfil do usuário
        fn create_engine(&self) -> Result<OcrEngine> {
            let language = Language::CreateLanguage(&HSTRING::from(self.language_tag.as_str()))
                .context("Falha ao criar idioma")?;

            if OcrEngine::IsLanguageSupported(&language).unwrap_or(false) {
                return OcrEngine::TryCreateFromLanguage(&language)
                    .context("Falha ao criar engine OCR");
            }

            warn!(
                "⚠️  Pacote OCR '{}' não instalado, usando idiomas do perfil",
                self.language_tag
            );
            OcrEngine::TryCreateFromUserProfileLanguages().context("Falha ao criar engine OCR")
        }
    }

    impl TextRecognizer for WindowsOcr {
        fn recognize(&self, image: &DynamicImage) -> Result<String> {
            // ================================================================
            // PASSO 1: PNG em memória -> stream do Windows
            // ================================================================
            let png_bytes = encode_png(image)?;

            let stream =
                InMemoryRandomAccessStream::new().context("Falha ao criar stream em memória")?;
            {
                let writer =
                    DataWriter::CreateDataWriter(&stream).context("Falha ao criar DataWriter")?;
                writer
                    .WriteBytes(&png_bytes)
                    .context("Falha ao escrever bytes")?;
                writer
                    .StoreAsync()
                    .context("Falha ao iniciar store")?
                    .get()
                    .context("Falha ao armazenar bytes")?;
                writer.DetachStream().context("Falha ao desanexar stream")?;
            }
            stream
                .Seek(0)
                .context("Falha ao voltar ao início do stream")?;

            // ================================================================
            // PASSO 2: Decodificar e executar OCR
            // ================================================================
            let decoder = BitmapDecoder::CreateAsync(&stream)
                .context("Falha ao criar decoder")?
                .get()
                .context("Falha ao decodificar imagem")?;

            let bitmap = decoder
                .GetSoftwareBitmapAsync()
                .context("Falha ao criar bitmap")?
                .get()
                .context("Falha ao obter bitmap")?;

            let result = self
                .create_engine()?
                .RecognizeAsync(&bitmap)
                .context("Falha ao executar OCR")?
                .get()
                .context("Falha ao obter resultado OCR")?;

            join_lines(&result)
        }

        fn name(&self) -> &'static str {
            "Windows OCR"
        }
    }

    /// Uma linha do OCR por linha de texto (o Text() junta tudo com espaços)
    fn join_lines(result: &OcrResult) -> Result<String> {
        let ocr_lines = result.Lines().context("Falha ao obter linhas")?;

        let mut lines = Vec::new();
        for i in 0..ocr_lines.Size()? {
            lines.push(ocr_lines.GetAt(i)?.Text()?.to_string_lossy());
        }
        Ok(lines.join("\n"))
    }
}
