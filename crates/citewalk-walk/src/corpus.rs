//! Corpus serialization.
//!
//! `text` writes one walk per line with node ids separated by single spaces,
//! the sentence layout word-embedding trainers consume. It assumes ids
//! without whitespace; `jsonl` (one JSON array per line) has no such limit.

use std::io::{BufRead, BufWriter, Write};

use citewalk_core::{Corpus, CorpusFormat, NodeId, Walk};

use crate::error::Result;

/// Write `corpus` in walk order.
pub fn write_corpus<W: Write>(writer: W, corpus: &Corpus, format: CorpusFormat) -> Result<()> {
    let mut out = BufWriter::new(writer);

    for walk in corpus {
        match format {
            CorpusFormat::Text => {
                for (i, node) in walk.iter().enumerate() {
                    if i > 0 {
                        out.write_all(b" ")?;
                    }
                    out.write_all(node.as_str().as_bytes())?;
                }
            }
            CorpusFormat::Jsonl => serde_json::to_writer(&mut out, walk)?,
        }
        out.write_all(b"\n")?;
    }

    out.flush()?;
    Ok(())
}

/// Read a corpus written by [`write_corpus`]. Blank lines are skipped.
pub fn read_corpus<R: BufRead>(reader: R, format: CorpusFormat) -> Result<Corpus> {
    let mut corpus = Corpus::new();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let walk = match format {
            CorpusFormat::Text => Walk(line.split(' ').map(NodeId::from).collect()),
            CorpusFormat::Jsonl => serde_json::from_str(&line)?,
        };
        corpus.push(walk);
    }

    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WalkError;

    fn sample_corpus() -> Corpus {
        vec![
            Walk(vec![NodeId::from("35"), NodeId::from("1033"), NodeId::from("35")]),
            Walk(vec![NodeId::from("1688")]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_write_text() {
        let mut out = Vec::new();
        write_corpus(&mut out, &sample_corpus(), CorpusFormat::Text).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "35 1033 35\n1688\n");
    }

    #[test]
    fn test_write_jsonl() {
        let mut out = Vec::new();
        write_corpus(&mut out, &sample_corpus(), CorpusFormat::Jsonl).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[\"35\",\"1033\",\"35\"]\n[\"1688\"]\n"
        );
    }

    #[test]
    fn test_jsonl_keeps_ids_with_spaces() {
        let corpus: Corpus = vec![Walk(vec![NodeId::from("paper one"), NodeId::from("paper two")])]
            .into_iter()
            .collect();

        let mut out = Vec::new();
        write_corpus(&mut out, &corpus, CorpusFormat::Jsonl).unwrap();
        let read = read_corpus(out.as_slice(), CorpusFormat::Jsonl).unwrap();
        assert_eq!(read, corpus);
    }

    #[test]
    fn test_read_text_skips_blank_lines() {
        let read = read_corpus("a b\n\nc\n".as_bytes(), CorpusFormat::Text).unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read.walks()[0].len(), 2);
    }

    #[test]
    fn test_read_jsonl_rejects_garbage() {
        let result = read_corpus("[\"a\"]\nnot json\n".as_bytes(), CorpusFormat::Jsonl);
        assert!(matches!(result, Err(WalkError::Serialization(_))));
    }
}
