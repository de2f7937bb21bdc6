//! Artifact persistence: job table, embedding matrices, fitted vectorizer,
//! and pretrained word vectors in word2vec text format.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::corpus::{CorpusArtifacts, CorpusError, JobRecord};
use crate::embedding::{EmbeddingMatrix, TfidfVectorizer, WordVectors};

pub const JOBS_FILE: &str = "jobs.json";
pub const DENSE_MATRIX_FILE: &str = "dense.matrix";
pub const SPARSE_MATRIX_FILE: &str = "sparse.matrix";
pub const VECTORIZER_FILE: &str = "vectorizer.json";

const MATRIX_MAGIC: &[u8; 4] = b"EMX1";
const MATRIX_HEADER_LEN: usize = 4 + 8 + 8;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> CorpusError + '_ {
    move |source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn malformed(path: &Path, reason: impl Into<String>) -> CorpusError {
    CorpusError::Malformed {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CorpusError> {
    let file = File::open(path).map_err(io_error(path))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CorpusError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), CorpusError> {
    let file = File::create(path).map_err(io_error(path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value).map_err(|source| CorpusError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_error(path))
}

/// Reads the job table; each record's `row` is its array position.
pub fn read_jobs(path: &Path) -> Result<Vec<JobRecord>, CorpusError> {
    let mut jobs: Vec<JobRecord> = read_json(path)?;
    for (row, job) in jobs.iter_mut().enumerate() {
        job.row = row;
    }
    Ok(jobs)
}

/// `EMX1` | rows: u64 LE | cols: u64 LE | rows * cols f32 LE, row-major.
pub fn write_matrix(path: &Path, matrix: &EmbeddingMatrix) -> Result<(), CorpusError> {
    let file = File::create(path).map_err(io_error(path))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(MATRIX_MAGIC).map_err(io_error(path))?;
    writer
        .write_all(&(matrix.rows() as u64).to_le_bytes())
        .map_err(io_error(path))?;
    writer
        .write_all(&(matrix.cols() as u64).to_le_bytes())
        .map_err(io_error(path))?;
    for value in matrix.as_slice() {
        writer
            .write_all(&value.to_le_bytes())
            .map_err(io_error(path))?;
    }
    writer.flush().map_err(io_error(path))
}

pub fn read_matrix(path: &Path) -> Result<EmbeddingMatrix, CorpusError> {
    let bytes = fs::read(path).map_err(io_error(path))?;
    if bytes.len() < MATRIX_HEADER_LEN {
        return Err(malformed(
            path,
            format!("{} bytes is shorter than the header", bytes.len()),
        ));
    }
    if &bytes[..4] != MATRIX_MAGIC {
        return Err(malformed(path, "bad magic, not an embedding matrix"));
    }
    let rows = read_u64(&bytes[4..12]);
    let cols = read_u64(&bytes[12..20]);
    let expected = rows
        .checked_mul(cols)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| malformed(path, format!("{rows}x{cols} overflows")))?;
    let body = &bytes[MATRIX_HEADER_LEN..];
    if body.len() != expected {
        return Err(malformed(
            path,
            format!("{rows}x{cols} needs {expected} data bytes, found {}", body.len()),
        ));
    }
    let data = body
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    Ok(EmbeddingMatrix::new(rows, cols, data)?)
}

fn read_u64(bytes: &[u8]) -> usize {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    u64::from_le_bytes(buf) as usize
}

pub fn read_vectorizer(path: &Path) -> Result<TfidfVectorizer, CorpusError> {
    read_json(path)
}

pub fn read_word_vectors(path: &Path) -> Result<WordVectors, CorpusError> {
    let file = File::open(path).map_err(io_error(path))?;
    parse_word_vectors(BufReader::new(file), path)
}

/// word2vec text format: a `<count> <dimension>` header, then one
/// `<word> <v1> .. <vd>` line per word. Later duplicates replace earlier ones.
pub fn parse_word_vectors<R: BufRead>(reader: R, path: &Path) -> Result<WordVectors, CorpusError> {
    let mut lines = reader.lines();
    let header = lines
        .next()
        .ok_or_else(|| malformed(path, "empty word-vector file"))?
        .map_err(io_error(path))?;
    let mut fields = header.split_whitespace();
    let (count, dimension) = match (
        fields.next().and_then(|f| f.parse::<usize>().ok()),
        fields.next().and_then(|f| f.parse::<usize>().ok()),
    ) {
        (Some(count), Some(dimension)) if dimension > 0 => (count, dimension),
        _ => return Err(malformed(path, format!("line 1: bad header {header:?}"))),
    };

    let mut vectors = WordVectors::new(dimension);
    let mut vector = Vec::with_capacity(dimension);
    for (index, line) in lines.enumerate() {
        let line_no = index + 2;
        let line = line.map_err(io_error(path))?;
        let mut fields = line.split_whitespace();
        let Some(word) = fields.next() else {
            continue;
        };
        vector.clear();
        for field in fields {
            let value = field
                .parse::<f32>()
                .map_err(|_| malformed(path, format!("line {line_no}: bad number {field:?}")))?;
            vector.push(value);
        }
        if vector.len() != dimension {
            return Err(malformed(
                path,
                format!(
                    "line {line_no}: {word:?} has {} values, expected {dimension}",
                    vector.len()
                ),
            ));
        }
        vectors.insert(word, &vector)?;
    }

    if vectors.vocabulary_len() != count {
        warn!(
            path = %path.display(),
            declared = count,
            loaded = vectors.vocabulary_len(),
            "word-vector count differs from header"
        );
    }
    Ok(vectors)
}

/// Locations of the four corpus artifacts in a data directory.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub jobs: PathBuf,
    pub dense_matrix: PathBuf,
    pub sparse_matrix: PathBuf,
    pub vectorizer: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            jobs: dir.join(JOBS_FILE),
            dense_matrix: dir.join(DENSE_MATRIX_FILE),
            sparse_matrix: dir.join(SPARSE_MATRIX_FILE),
            vectorizer: dir.join(VECTORIZER_FILE),
        }
    }
}

pub fn load_artifacts(data_dir: &Path, word_vectors_path: &Path) -> Result<CorpusArtifacts, CorpusError> {
    let paths = ArtifactPaths::in_dir(data_dir);

    let jobs = read_jobs(&paths.jobs)?;
    info!(path = %paths.jobs.display(), jobs = jobs.len(), "Loaded job records");

    let dense_matrix = read_matrix(&paths.dense_matrix)?;
    let sparse_matrix = read_matrix(&paths.sparse_matrix)?;
    info!(
        dense = ?(dense_matrix.rows(), dense_matrix.cols()),
        sparse = ?(sparse_matrix.rows(), sparse_matrix.cols()),
        "Loaded embedding matrices"
    );

    let vectorizer = read_vectorizer(&paths.vectorizer)?;
    info!(vocabulary = vectorizer.dimension(), "Loaded TF-IDF vectorizer");

    let word_vectors = read_word_vectors(word_vectors_path)?;
    info!(
        path = %word_vectors_path.display(),
        words = word_vectors.vocabulary_len(),
        dimension = word_vectors.dimension(),
        "Loaded word vectors"
    );

    Ok(CorpusArtifacts {
        jobs,
        word_vectors,
        vectorizer,
        dense_matrix,
        sparse_matrix,
    })
}

pub fn write_artifacts(
    out_dir: &Path,
    jobs: &[JobRecord],
    dense_matrix: &EmbeddingMatrix,
    sparse_matrix: &EmbeddingMatrix,
    vectorizer: &TfidfVectorizer,
) -> Result<ArtifactPaths, CorpusError> {
    fs::create_dir_all(out_dir).map_err(io_error(out_dir))?;
    let paths = ArtifactPaths::in_dir(out_dir);
    write_json(&paths.jobs, jobs)?;
    write_matrix(&paths.dense_matrix, dense_matrix)?;
    write_matrix(&paths.sparse_matrix, sparse_matrix)?;
    write_json(&paths.vectorizer, vectorizer)?;
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::fixtures::{tiny_artifacts, word_vectors_text};
    use std::io::Cursor;

    fn parse(text: &str) -> Result<WordVectors, CorpusError> {
        parse_word_vectors(Cursor::new(text), Path::new("vectors.txt"))
    }

    #[test]
    fn test_matrix_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.matrix");
        let matrix = EmbeddingMatrix::new(2, 3, vec![1.0, -2.5, 0.0, 3.25, 1e-7, 9.0]).unwrap();
        write_matrix(&path, &matrix).unwrap();
        assert_eq!(read_matrix(&path).unwrap(), matrix);
        assert_eq!(fs::metadata(&path).unwrap().len(), 20 + 6 * 4);
    }

    #[test]
    fn test_matrix_rejects_truncated_body() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.matrix");
        let matrix = EmbeddingMatrix::new(2, 2, vec![1.0; 4]).unwrap();
        write_matrix(&path, &matrix).unwrap();
        let mut bytes = fs::read(&path).unwrap();
        bytes.truncate(bytes.len() - 3);
        fs::write(&path, bytes).unwrap();
        assert!(matches!(read_matrix(&path), Err(CorpusError::Malformed { .. })));
    }

    #[test]
    fn test_matrix_rejects_bad_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.matrix");
        fs::write(&path, [0u8; 24]).unwrap();
        let err = read_matrix(&path).unwrap_err();
        assert!(err.to_string().contains("bad magic"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_jobs(Path::new("/definitely/not/here/jobs.json")).unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
    }

    #[test]
    fn test_parse_word_vectors() {
        let wv = parse("2 3\npython 1 0 0\nnurse 0 1 0.5\n").unwrap();
        assert_eq!(wv.dimension(), 3);
        assert_eq!(wv.vocabulary_len(), 2);
        assert_eq!(wv.get("nurse"), Some(&[0.0, 1.0, 0.5][..]));
    }

    #[test]
    fn test_parse_word_vectors_skips_blank_lines() {
        let wv = parse("1 2\n\npython 1 2\n\n").unwrap();
        assert_eq!(wv.vocabulary_len(), 1);
    }

    #[test]
    fn test_parse_word_vectors_reports_line() {
        let err = parse("2 3\npython 1 0 0\nnurse 0 one 0\n").unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");

        let err = parse("2 3\npython 1 0\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn test_parse_word_vectors_bad_header() {
        assert!(matches!(parse("python 1 0 0\n"), Err(CorpusError::Malformed { .. })));
        assert!(matches!(parse(""), Err(CorpusError::Malformed { .. })));
    }

    #[test]
    fn test_artifacts_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = tiny_artifacts();
        write_artifacts(
            dir.path(),
            &artifacts.jobs,
            &artifacts.dense_matrix,
            &artifacts.sparse_matrix,
            &artifacts.vectorizer,
        )
        .unwrap();
        let wv_path = dir.path().join("vectors.txt");
        fs::write(&wv_path, word_vectors_text()).unwrap();

        let loaded = load_artifacts(dir.path(), &wv_path).unwrap();
        assert_eq!(loaded.jobs, artifacts.jobs);
        assert_eq!(loaded.dense_matrix, artifacts.dense_matrix);
        assert_eq!(loaded.sparse_matrix, artifacts.sparse_matrix);
        assert_eq!(loaded.vectorizer, artifacts.vectorizer);
        assert_eq!(loaded.word_vectors.vocabulary_len(), artifacts.word_vectors.vocabulary_len());
    }
}
