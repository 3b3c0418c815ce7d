//! Compiled shader buffers and shader group blobs.
//!
//! A compiled shader buffer is self-describing:
//!
//! ```text
//! u64 bytecode_size
//! u8  hash[16]
//! u8  bytecode[bytecode_size]
//! ```
//!
//! A shader group blob (`.sd`) is a `u32` shader count followed by
//! `(u32 key, compiled shader buffer)` pairs. Keys are chosen by the caller,
//! typically a permutation or stage index.

use crate::content::blob_stream::{BlobReader, BlobWriter};
use crate::error::{Error, Result};

/// Bytes of the content hash stored in front of the bytecode
pub const SHADER_HASH_LENGTH: usize = 16;

/// Compiled shader bytecode with its content hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledShader {
    hash: [u8; SHADER_HASH_LENGTH],
    bytecode: Vec<u8>,
}

impl CompiledShader {
    pub fn new(bytecode: Vec<u8>, hash: [u8; SHADER_HASH_LENGTH]) -> Self {
        Self { hash, bytecode }
    }

    pub fn hash(&self) -> &[u8; SHADER_HASH_LENGTH] {
        &self.hash
    }

    pub fn bytecode(&self) -> &[u8] {
        &self.bytecode
    }

    /// Total size of the self-describing buffer
    pub fn buffer_size(&self) -> usize {
        8 + SHADER_HASH_LENGTH + self.bytecode.len()
    }

    pub fn write_to(&self, writer: &mut BlobWriter) {
        writer.write_u64(self.bytecode.len() as u64);
        writer.write_bytes(&self.hash);
        writer.write_bytes(&self.bytecode);
    }

    pub fn read_from(reader: &mut BlobReader<'_>) -> Result<Self> {
        let size = reader.read_u64()?;
        let size = usize::try_from(size)
            .map_err(|_| Error::InvalidData(format!("shader bytecode size {} overflows", size)))?;
        let mut hash = [0u8; SHADER_HASH_LENGTH];
        hash.copy_from_slice(reader.read_bytes(SHADER_HASH_LENGTH)?);
        let bytecode = reader.read_bytes(size)?.to_vec();
        Ok(Self { hash, bytecode })
    }

    /// Encode as a standalone buffer
    pub fn to_buffer(&self) -> Vec<u8> {
        let mut writer = BlobWriter::with_capacity(self.buffer_size());
        self.write_to(&mut writer);
        writer.finish()
    }

    /// Decode a standalone buffer (no trailing bytes allowed)
    pub fn from_buffer(buffer: &[u8]) -> Result<Self> {
        let mut reader = BlobReader::new(buffer);
        let shader = Self::read_from(&mut reader)?;
        reader.expect_end()?;
        Ok(shader)
    }
}

/// Write a shader group blob
pub fn pack_shader_group(shaders: &[(u32, CompiledShader)]) -> Vec<u8> {
    let size = 4 + shaders.iter().map(|(_, s)| 4 + s.buffer_size()).sum::<usize>();
    let mut writer = BlobWriter::with_capacity(size);
    writer.write_u32(shaders.len() as u32);
    for (key, shader) in shaders {
        writer.write_u32(*key);
        shader.write_to(&mut writer);
    }
    writer.finish()
}

/// Read a shader group blob into `(key, shader)` pairs, in blob order
pub fn unpack_shader_group(blob: &[u8]) -> Result<Vec<(u32, CompiledShader)>> {
    let mut reader = BlobReader::new(blob);
    let count = reader.read_u32()?;
    let mut shaders = Vec::with_capacity(count.min(256) as usize);
    for _ in 0..count {
        let key = reader.read_u32()?;
        shaders.push((key, CompiledShader::read_from(&mut reader)?));
    }
    reader.expect_end()?;
    Ok(shaders)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
