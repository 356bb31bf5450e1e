use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::tagger::AnyTagger;

/// Model data: the head of a tagger chain.
///
/// The whole chain is stored, including the frequency tables of every level, the backoff
/// topology, and the sources of regular expressions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    tagger: AnyTagger,
}

impl Model {
    pub fn new<T>(tagger: T) -> Self
    where
        T: Into<AnyTagger>,
    {
        Self {
            tagger: tagger.into(),
        }
    }

    pub const fn tagger(&self) -> &AnyTagger {
        &self.tagger
    }

    pub fn into_tagger(self) -> AnyTagger {
        self.tagger
    }

    /// Exports the model data.
    ///
    /// # Arguments
    ///
    /// * `wtr` - Byte-oriented sink object.
    ///
    /// # Errors
    ///
    /// When `wtr` generates an error, it will be returned as is.
    pub fn write<W>(&self, wtr: &mut W) -> Result<()>
    where
        W: Write,
    {
        bincode::serde::encode_into_std_write(self, wtr, bincode::config::standard())?;
        Ok(())
    }

    /// Creates a model from a reader.
    ///
    /// # Arguments
    ///
    /// * `rdr` - A data source.
    ///
    /// # Returns
    ///
    /// A model data read from `rdr`.
    ///
    /// # Errors
    ///
    /// When `rdr` generates an error, it will be returned as is. If the orders of the stored
    /// backoff chain are inconsistent, an error variant will be returned.
    pub fn read<R>(rdr: &mut R) -> Result<Self>
    where
        R: Read,
    {
        let model: Self = bincode::serde::decode_from_std_read(rdr, bincode::config::standard())?;
        model.tagger.check_chain()?;
        Ok(model)
    }
}
