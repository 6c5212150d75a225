/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : 词表与文本/id互转工具（无状态、无可训练参数）
 */

use std::collections::HashMap;

use super::VocabError;

pub const PAD: &str = "<PAD>";
pub const EOS: &str = "<EOS>";
pub const UNK: &str = "<UNK>";
pub const GO: &str = "<GO>";

/// 只读的“词 ↔ id”双向映射
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocab {
    word_to_id: HashMap<String, usize>,
    id_to_word: HashMap<usize, String>,
}

impl Vocab {
    /// 由（词, id）对构建，id 重复时报错
    pub fn from_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, usize)>,
    ) -> Result<Self, VocabError> {
        let mut vocab = Self::default();
        for (word, id) in pairs {
            vocab.insert(word.to_string(), id)?;
        }
        Ok(vocab)
    }

    pub fn from_map(map: HashMap<String, usize>) -> Result<Self, VocabError> {
        let mut vocab = Self::default();
        for (word, id) in map {
            vocab.insert(word, id)?;
        }
        Ok(vocab)
    }

    /// 由原始文本建表：先保留`<PAD>`=0、`<EOS>`=1、`<UNK>`=2、`<GO>`=3，
    /// 其余（小写后的）词按首次出现的顺序依次编号
    pub fn build_from_text(text: &str) -> Self {
        let mut vocab = Self::default();
        for (id, special) in [PAD, EOS, UNK, GO].into_iter().enumerate() {
            vocab.word_to_id.insert(special.to_string(), id);
            vocab.id_to_word.insert(id, special.to_string());
        }
        for word in text.to_lowercase().split_whitespace() {
            if !vocab.word_to_id.contains_key(word) {
                let id = vocab.word_to_id.len();
                vocab.word_to_id.insert(word.to_string(), id);
                vocab.id_to_word.insert(id, word.to_string());
            }
        }
        vocab
    }

    fn insert(&mut self, word: String, id: usize) -> Result<(), VocabError> {
        if let Some(first) = self.id_to_word.get(&id) {
            if *first != word {
                return Err(VocabError::DuplicateId {
                    id,
                    first: first.clone(),
                    second: word,
                });
            }
        }
        if let Some(old_id) = self.word_to_id.insert(word.clone(), id) {
            self.id_to_word.remove(&old_id);
        }
        self.id_to_word.insert(id, word);
        Ok(())
    }

    pub fn id(&self, word: &str) -> Option<usize> {
        self.word_to_id.get(word).copied()
    }

    /// 查找必需的键，缺失即为配置错误
    pub fn require(&self, key: &str) -> Result<usize, VocabError> {
        self.id(key)
            .ok_or_else(|| VocabError::UnknownKey(key.to_string()))
    }

    /// 普通词查表：不在词表中的词映射为`<UNK>`
    pub fn lookup(&self, word: &str) -> Result<usize, VocabError> {
        match self.id(word) {
            Some(id) => Ok(id),
            None => self.unk_id(),
        }
    }

    pub fn go_id(&self) -> Result<usize, VocabError> {
        self.require(GO)
    }

    pub fn eos_id(&self) -> Result<usize, VocabError> {
        self.require(EOS)
    }

    pub fn unk_id(&self) -> Result<usize, VocabError> {
        self.require(UNK)
    }

    pub fn pad_id(&self) -> Result<usize, VocabError> {
        self.require(PAD)
    }

    pub fn word(&self, id: usize) -> Option<&str> {
        self.id_to_word.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.word_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word_to_id.is_empty()
    }

    /// 模型所需的词表大小（最大 id + 1）
    pub fn size(&self) -> usize {
        self.id_to_word.keys().max().map_or(0, |&max| max + 1)
    }

    /// id 序列转为词序列：遇到`<EOS>`即停止，跳过`<PAD>`，未知 id 记为`<UNK>`
    pub fn ids_to_words(&self, ids: &[usize]) -> Vec<String> {
        let eos = self.id(EOS);
        let pad = self.id(PAD);
        ids.iter()
            .take_while(|&&id| Some(id) != eos)
            .filter(|&&id| Some(id) != pad)
            .map(|&id| self.word(id).unwrap_or(UNK).to_string())
            .collect()
    }

    pub fn ids_to_sentence(&self, ids: &[usize]) -> String {
        self.ids_to_words(ids).join(" ")
    }
}

/// 把源/目标文本（按行分句、按空白分词）转为 id 序列；
/// 目标句末尾追加`<EOS>`，不在词表中的词映射为`<UNK>`
pub fn text_to_ids(
    source_text: &str,
    target_text: &str,
    source_vocab: &Vocab,
    target_vocab: &Vocab,
) -> Result<(Vec<Vec<usize>>, Vec<Vec<usize>>), VocabError> {
    let source_ids = source_text
        .split('\n')
        .map(|sentence| {
            sentence
                .split_whitespace()
                .map(|word| source_vocab.lookup(word))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let eos = target_vocab.eos_id()?;
    let target_ids = target_text
        .split('\n')
        .map(|sentence| {
            let mut ids = sentence
                .split_whitespace()
                .map(|word| target_vocab.lookup(word))
                .collect::<Result<Vec<_>, _>>()?;
            ids.push(eos);
            Ok(ids)
        })
        .collect::<Result<Vec<_>, VocabError>>()?;

    Ok((source_ids, target_ids))
}

/// 把一句话转为 id 序列：先转小写、按空白分词，不在词表中的词映射为`<UNK>`
pub fn sentence_to_seq(sentence: &str, vocab: &Vocab) -> Result<Vec<usize>, VocabError> {
    sentence
        .to_lowercase()
        .split_whitespace()
        .map(|word| vocab.lookup(word))
        .collect()
}
