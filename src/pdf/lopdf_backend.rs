use super::{PageSource, PdfBackend};
use crate::error::{Result, SplitterError};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::path::Path;
use tracing::debug;

/// ページから親の Pages ノードへ継承される属性
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Pages ツリーを遡る上限
const MAX_TREE_DEPTH: usize = 32;

/// lopdf による実装
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfBackend;

/// 読み込んだPDF
#[derive(Debug, Clone)]
pub struct LopdfDocument {
    name: String,
    doc: Document,
    /// ページ番号（1始まり、文書順）
    page_numbers: Vec<u32>,
}

impl LopdfDocument {
    pub fn from_document(name: impl Into<String>, doc: Document) -> Self {
        let page_numbers = doc.get_pages().keys().copied().collect();
        Self {
            name: name.into(),
            doc,
            page_numbers,
        }
    }
}

impl PageSource for LopdfDocument {
    fn name(&self) -> &str {
        &self.name
    }

    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&self, index: usize) -> String {
        let Some(&number) = self.page_numbers.get(index) else {
            return String::new();
        };

        match self.doc.extract_text(&[number]) {
            Ok(text) => text,
            Err(e) => {
                debug!(source = %self.name, page = number, error = %e, "テキスト抽出に失敗（空として扱う）");
                String::new()
            }
        }
    }
}

impl PdfBackend for LopdfBackend {
    type Document = LopdfDocument;

    fn open(&self, path: &Path) -> Result<LopdfDocument> {
        let doc = Document::load(path)
            .map_err(|e| SplitterError::PdfOpen(format!("{}: {}", path.display(), e)))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(LopdfDocument::from_document(name, doc))
    }

    fn write_pages(&self, pages: &[(&LopdfDocument, usize)], output: &Path) -> Result<()> {
        // 同じ文書の連続したページをまとめる
        let mut groups: Vec<(&LopdfDocument, Vec<usize>)> = Vec::new();
        for (document, index) in pages {
            match groups.last_mut() {
                Some((last, indices)) if std::ptr::eq(*last, *document) => indices.push(*index),
                _ => groups.push((*document, vec![*index])),
            }
        }

        let mut assembled = assemble(&groups)?;
        assembled
            .save(output)
            .map_err(|e| SplitterError::PdfWrite(format!("{}: {}", output.display(), e)))?;
        Ok(())
    }
}

/// 複数文書から指定ページだけを取り出して1つの文書にする
fn assemble(groups: &[(&LopdfDocument, Vec<usize>)]) -> Result<Document> {
    let mut output = Document::with_version("1.5");
    let mut kids: Vec<ObjectId> = Vec::new();
    let mut next_id = 1;

    for (source, indices) in groups {
        let mut doc = source.doc.clone();
        doc.renumber_objects_with(next_id);
        next_id = doc.max_id + 1;

        let pages = doc.get_pages();
        for &index in indices {
            let page_id = source
                .page_numbers
                .get(index)
                .and_then(|number| pages.get(number))
                .copied()
                .ok_or_else(|| {
                    SplitterError::PdfWrite(format!("{}: ページ {} がありません", source.name, index + 1))
                })?;
            inherit_page_attributes(&mut doc, page_id);
            kids.push(page_id);
        }

        // 元のページツリーとカタログは作り直すので持ち込まない
        for (id, object) in doc.objects {
            if matches!(object_type(&object), Some(b"Catalog") | Some(b"Pages")) {
                continue;
            }
            output.objects.insert(id, object);
        }
    }

    let pages_id: ObjectId = (next_id, 0);
    let catalog_id: ObjectId = (next_id + 1, 0);

    for kid in &kids {
        if let Some(Object::Dictionary(page)) = output.objects.get_mut(kid) {
            page.set("Parent", pages_id);
        }
    }

    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set(
        "Kids",
        kids.iter().map(|&id| Object::Reference(id)).collect::<Vec<Object>>(),
    );
    pages.set("Count", kids.len() as i64);
    output.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", pages_id);
    output.objects.insert(catalog_id, Object::Dictionary(catalog));

    output.trailer.set("Root", catalog_id);
    output.max_id = catalog_id.0;
    output.prune_objects();
    output.compress();

    Ok(output)
}

fn object_type(object: &Object) -> Option<&[u8]> {
    object.as_dict().ok()?.get(b"Type").ok()?.as_name().ok()
}

/// 親ノードから継承している属性をページ自身に写す
fn inherit_page_attributes(doc: &mut Document, page_id: ObjectId) {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return;
    };

    let mut missing: Vec<&[u8]> = INHERITABLE.iter().copied().filter(|key| !page.has(key)).collect();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut inherited: Vec<(Vec<u8>, Object)> = Vec::new();
    let mut depth = 0;

    while let Some(parent_id) = parent {
        if missing.is_empty() || depth >= MAX_TREE_DEPTH {
            break;
        }
        let Ok(node) = doc.get_dictionary(parent_id) else {
            break;
        };

        missing.retain(|key| match node.get(key) {
            Ok(value) => {
                inherited.push((key.to_vec(), value.clone()));
                false
            }
            Err(_) => true,
        });
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    if let Ok(page) = doc.get_object_mut(page_id).and_then(Object::as_dict_mut) {
        for (key, value) in inherited {
            page.set(key, value);
        }
    }
}
