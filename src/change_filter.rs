// chat-overlay-translator/src/change_filter.rs

// ============================================================================
// MÓDULO CHANGE FILTER - Detecta se o texto do OCR mudou
// ============================================================================
//
// Guarda só um hash (fingerprint) do último texto processado. Se o OCR
// devolver o mesmo texto (inclusive o mesmo "ruído"), não traduz de novo.
//
// ============================================================================

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Hash de tamanho fixo do texto reconhecido
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Calcula o fingerprint do texto (já sem espaços nas pontas)
    pub fn of(text: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        text.trim().hash(&mut hasher);
        Fingerprint(hasher.finish())
    }
}

/// Resultado da comparação
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Texto vazio: sem sinal, nada a fazer
    NoSignal,
    /// Mesmo fingerprint do ciclo anterior
    Unchanged,
    /// Texto novo, com o fingerprint que deve substituir o anterior
    Changed(Fingerprint),
}

/// Compara o texto novo com o último fingerprint.
///
/// Texto vazio (depois do trim) nunca gera fingerprint.
pub fn has_changed(new_text: &str, last: Option<Fingerprint>) -> Change {
    if new_text.trim().is_empty() {
        return Change::NoSignal;
    }

    let fingerprint = Fingerprint::of(new_text);
    if Some(fingerprint) == last {
        Change::Unchanged
    } else {
        Change::Changed(fingerprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_is_unchanged() {
        let first = match has_changed("Привет", None) {
            Change::Changed(fp) => fp,
            other => panic!("esperava Changed, veio {:?}", other),
        };
        assert_eq!(has_changed("Привет", Some(first)), Change::Unchanged);
        // Espaços nas pontas não contam
        assert_eq!(has_changed("  Привет\n", Some(first)), Change::Unchanged);
    }

    #[test]
    fn different_text_is_changed() {
        let first = Fingerprint::of("Привет");
        for text in ["Пока", "Привет!", "привет", "Привет мир"] {
            assert!(matches!(has_changed(text, Some(first)), Change::Changed(_)));
        }
    }

    #[test]
    fn empty_text_is_no_signal() {
        let last = Some(Fingerprint::of("abc"));
        assert_eq!(has_changed("", last), Change::NoSignal);
        assert_eq!(has_changed("   \n\t", last), Change::NoSignal);
        assert_eq!(has_changed("", None), Change::NoSignal);
    }

    #[test]
    fn repeated_ocr_noise_is_suppressed() {
        let noise = "|l1 ._ ,";
        let fp = Fingerprint::of(noise);
        assert_eq!(has_changed(noise, Some(fp)), Change::Unchanged);
    }
}
