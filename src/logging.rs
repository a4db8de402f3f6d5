// chat-overlay-translator/src/logging.rs

// ============================================================================
// MÓDULO LOGGING - Terminal + logs.txt
// ============================================================================
//
// Cada linha de log vai para o stderr E para logs.txt (ao lado do .exe).
// Se o arquivo não puder ser aberto/escrito, o log segue só no terminal:
// falha do log nunca derruba a aplicação.
//
// ============================================================================

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Nome do arquivo de log
const LOG_FILE: &str = "logs.txt";

/// Writer que duplica a saída: stderr + arquivo (opcional)
struct TeeWriter {
    file: Option<File>,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let _ = io::stderr().write_all(buf);
        if let Some(file) = self.file.as_mut() {
            if file.write_all(buf).is_err() {
                // Desiste do arquivo, continua no terminal
                self.file = None;
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let _ = io::stderr().flush();
        if let Some(file) = self.file.as_mut() {
            let _ = file.flush();
        }
        Ok(())
    }
}

/// Caminho do logs.txt: pasta do executável, ou a pasta atual
pub fn log_file_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(LOG_FILE)))
        .unwrap_or_else(|| PathBuf::from(LOG_FILE))
}

/// Comando que abre um arquivo no programa padrão do sistema
pub fn opener_command(path: &Path) -> Command {
    #[cfg(windows)]
    let mut command = {
        // "" é o título da janela do start
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    };
    #[cfg(target_os = "macos")]
    let mut command = Command::new("open");
    #[cfg(not(any(windows, target_os = "macos")))]
    let mut command = Command::new("xdg-open");

    command.arg(path);
    command
}

/// Inicializa o env_logger (nível padrão "info", sobrescrito por RUST_LOG)
pub fn init() {
    let path = log_file_path();
    let file = OpenOptions::new().create(true).append(true).open(&path).ok();
    let file_ok = file.is_some();

    let result = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .target(env_logger::Target::Pipe(Box::new(TeeWriter { file })))
        .try_init();

    if result.is_err() {
        // Logger já inicializado (ex: testes)
        return;
    }

    if file_ok {
        debug!("📝 Log também em {}", path.display());
    } else {
        warn!("⚠️  Não foi possível abrir {}, log só no terminal", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_survives_without_file() {
        let mut writer = TeeWriter { file: None };
        assert_eq!(writer.write(b"linha\n").unwrap(), 6);
        assert!(writer.flush().is_ok());
    }

    #[test]
    fn log_path_ends_with_file_name() {
        assert!(log_file_path().ends_with(LOG_FILE));
    }

    #[test]
    fn opener_receives_the_log_path_last() {
        let path = log_file_path();
        let command = opener_command(&path);
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args.last(), Some(&path.as_os_str()));

        #[cfg(windows)]
        {
            assert_eq!(command.get_program(), "cmd");
            let flags: Vec<_> = args[..3].iter().map(|arg| arg.to_string_lossy()).collect();
            assert_eq!(flags, ["/C", "start", ""]);
        }
        #[cfg(target_os = "macos")]
        assert_eq!(command.get_program(), "open");
        #[cfg(not(any(windows, target_os = "macos")))]
        {
            assert_eq!(command.get_program(), "xdg-open");
            assert_eq!(args.len(), 1);
        }
    }
}
