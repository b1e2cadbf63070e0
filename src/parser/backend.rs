//! PDF backend abstraction layer.
//!
//! The splitting pipeline only sees two narrow traits: [`PageSource`]
//! for reading page text and dimensions, and [`DocumentWriter`] for
//! turning an [`OutputDocument`] into PDF bytes. [`LopdfBackend`] is the
//! concrete implementation over `lopdf`.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use lopdf::{dictionary, Dictionary, Document as LopdfDocument, Object, ObjectId, Stream};

use crate::detect::{sniff_bytes, sniff_path};
use crate::error::{Error, Result};
use crate::model::{OutputDocument, PageSize, PageSlot};

/// Read access to the pages of an input document.
///
/// Page indices are 0-based and follow document order.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Extracted plain text of a page. Pages without a text layer yield
    /// an empty string, not an error.
    fn page_text(&self, index: usize) -> Result<String>;

    /// Dimensions of a page, when they can be determined.
    fn page_size(&self, index: usize) -> Option<PageSize>;
}

/// Produces PDF bytes for an output document built from a source.
pub trait DocumentWriter {
    /// Serialize the pages of `doc`, in order.
    fn serialize(&self, doc: &OutputDocument) -> Result<Vec<u8>>;
}

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"Resources", b"CropBox", b"Rotate"];

/// Concrete [`PageSource`] and [`DocumentWriter`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
    page_ids: Vec<ObjectId>,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        sniff_path(path)?;
        let doc = LopdfDocument::load(path)?;
        Self::from_document(doc)
    }

    /// Load from an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        sniff_bytes(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Self::from_document(doc)
    }

    /// Load from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Wrap an already loaded document.
    ///
    /// Encrypted documents are rejected: their text and content streams
    /// cannot be read or copied as they are.
    pub fn from_document(doc: LopdfDocument) -> Result<Self> {
        let page_ids = doc.get_pages().into_values().collect();
        let backend = Self { doc, page_ids };
        if backend.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(backend)
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    fn page_id(&self, index: usize) -> Result<ObjectId> {
        self.page_ids
            .get(index)
            .copied()
            .ok_or(Error::PageOutOfRange(index, self.page_ids.len()))
    }

    /// Look up a page attribute, walking up `/Parent` links when the page
    /// itself does not carry it.
    fn inherited(&self, page_id: ObjectId, key: &[u8]) -> Option<&Object> {
        let mut current = page_id;
        // Bounded walk; malformed files can contain parent cycles.
        for _ in 0..64 {
            let dict = self.doc.get_object(current).and_then(Object::as_dict).ok()?;
            if let Ok(value) = dict.get(key) {
                return Some(value);
            }
            current = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
        }
        None
    }

    /// Copy of every inheritable attribute that applies to a page.
    fn effective_attributes(&self, page_id: ObjectId) -> Vec<(&'static [u8], Object)> {
        INHERITABLE
            .iter()
            .filter_map(|key| self.inherited(page_id, key).map(|v| (*key, v.clone())))
            .collect()
    }
}

impl PageSource for LopdfBackend {
    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn page_text(&self, index: usize) -> Result<String> {
        let page_id = self.page_id(index)?;
        let has_content = self
            .doc
            .get_dictionary(page_id)
            .map(|d| d.has(b"Contents"))
            .unwrap_or(false);
        if !has_content {
            return Ok(String::new());
        }

        let page_num = (index + 1) as u32;
        self.doc
            .extract_text(&[page_num])
            .map_err(|e| Error::TextExtract {
                page: index,
                reason: e.to_string(),
            })
    }

    fn page_size(&self, index: usize) -> Option<PageSize> {
        let page_id = *self.page_ids.get(index)?;
        let media_box = self.inherited(page_id, b"MediaBox")?;
        let media_box = match media_box {
            Object::Reference(r) => self.doc.get_object(*r).ok()?,
            other => other,
        };
        let array = media_box.as_array().ok()?;
        if array.len() < 4 {
            return None;
        }
        let coords: Vec<f32> = array.iter().filter_map(|o| o.as_float().ok()).collect();
        if coords.len() < 4 {
            return None;
        }
        let width = (coords[2] - coords[0]).abs();
        let height = (coords[3] - coords[1]).abs();
        (width > 0.0 && height > 0.0).then_some(PageSize::new(width, height))
    }
}

impl DocumentWriter for LopdfBackend {
    fn serialize(&self, output: &OutputDocument) -> Result<Vec<u8>> {
        let mut copier = PageCopier::new(self, output)?;
        let pages_id = copier.target.new_object_id();

        let mut kids = Vec::with_capacity(output.page_count());
        for slot in output.pages() {
            let page_id = match *slot {
                PageSlot::Content { index, .. } => {
                    copier.copy_page(self.page_id(index)?, pages_id)?
                }
                PageSlot::Blank { size } => add_blank_page(&mut copier.target, pages_id, size),
            };
            kids.push(Object::Reference(page_id));
        }
        copier.drain();

        let mut doc = copier.target;
        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| Error::Write(e.to_string()))?;
        Ok(bytes)
    }
}

/// Keys never followed when copying objects into an output document.
/// `Parent` leads back into the source page tree or form field tree and
/// `StructParent(s)` into the structure tree, both spanning every page.
const DETACHED_KEYS: [&[u8]; 3] = [b"Parent", b"StructParent", b"StructParents"];

/// Page keys handled separately: annotations are filtered and article
/// beads are dropped.
const PAGE_ONLY_KEYS: [&[u8]; 2] = [b"Annots", b"B"];

/// Copies the objects reachable from a set of source pages into a fresh
/// document.
///
/// References to source pages that are not part of the output, and to
/// page tree nodes, become `null`. Document level structures (outlines,
/// name trees, the structure tree, interactive forms) are never reached.
struct PageCopier<'a> {
    backend: &'a LopdfBackend,
    target: LopdfDocument,
    /// Source page id to output page id, for every page in the output.
    kept: BTreeMap<ObjectId, ObjectId>,
    /// Source object id to output object id, for everything else copied.
    copied: BTreeMap<ObjectId, ObjectId>,
    pending: Vec<(ObjectId, ObjectId)>,
}

impl<'a> PageCopier<'a> {
    fn new(backend: &'a LopdfBackend, output: &OutputDocument) -> Result<Self> {
        let mut target = LopdfDocument::with_version(backend.doc.version.clone());
        let mut kept = BTreeMap::new();
        for index in output.pages().iter().filter_map(PageSlot::source_index) {
            let page_id = backend.page_id(index)?;
            kept.entry(page_id).or_insert_with(|| target.new_object_id());
        }
        Ok(Self {
            backend,
            target,
            kept,
            copied: BTreeMap::new(),
            pending: Vec::new(),
        })
    }

    /// Copy a source page under `parent`, making inherited attributes
    /// explicit and dropping annotations that point at pages left out.
    ///
    /// A page placed twice is written once and referenced twice.
    fn copy_page(&mut self, page_id: ObjectId, parent: ObjectId) -> Result<ObjectId> {
        let target_id = self
            .kept
            .get(&page_id)
            .copied()
            .ok_or_else(|| Error::Write(format!("page {:?} is not part of the output", page_id)))?;
        if self.target.objects.contains_key(&target_id) {
            return Ok(target_id);
        }

        let backend = self.backend;
        let source = backend.doc.get_dictionary(page_id)?;
        let mut page = Dictionary::new();
        for (key, value) in source.iter() {
            let key_bytes = key.as_slice();
            if DETACHED_KEYS.contains(&key_bytes) || PAGE_ONLY_KEYS.contains(&key_bytes) {
                continue;
            }
            page.set(key.clone(), self.translate(value));
        }
        for (key, value) in backend.effective_attributes(page_id) {
            if !page.has(key) {
                page.set(key, self.translate(&value));
            }
        }

        let linked: Vec<&Object> = self
            .annotations(source)
            .into_iter()
            .filter(|annot| !self.links_elsewhere(annot))
            .collect();
        let annots: Vec<Object> = linked.into_iter().map(|annot| self.translate(annot)).collect();
        if !annots.is_empty() {
            page.set("Annots", annots);
        }

        page.set("Parent", parent);
        self.target.objects.insert(target_id, Object::Dictionary(page));
        Ok(target_id)
    }

    /// Copy every object queued by [`translate`](Self::translate).
    fn drain(&mut self) {
        let backend = self.backend;
        while let Some((source_id, target_id)) = self.pending.pop() {
            let object = match backend.doc.get_object(source_id) {
                Ok(object) => self.translate(object),
                Err(_) => Object::Null,
            };
            self.target.objects.insert(target_id, object);
        }
    }

    /// Rewrite an object for the output document, queueing referenced
    /// objects for copying.
    fn translate(&mut self, object: &Object) -> Object {
        match object {
            Object::Reference(id) => self.reference(*id),
            Object::Array(items) => Object::Array(items.iter().map(|o| self.translate(o)).collect()),
            Object::Dictionary(dict) => Object::Dictionary(self.translate_dict(dict)),
            Object::Stream(stream) => {
                let mut stream = stream.clone();
                stream.dict = self.translate_dict(&stream.dict);
                Object::Stream(stream)
            }
            other => other.clone(),
        }
    }

    fn translate_dict(&mut self, dict: &Dictionary) -> Dictionary {
        let mut out = Dictionary::new();
        for (key, value) in dict.iter() {
            if DETACHED_KEYS.contains(&key.as_slice()) {
                continue;
            }
            out.set(key.clone(), self.translate(value));
        }
        out
    }

    fn reference(&mut self, id: ObjectId) -> Object {
        if let Some(target_id) = self.kept.get(&id) {
            return Object::Reference(*target_id);
        }
        if let Some(target_id) = self.copied.get(&id) {
            return Object::Reference(*target_id);
        }
        if self.is_page_tree_node(id) {
            return Object::Null;
        }
        let target_id = self.target.new_object_id();
        self.copied.insert(id, target_id);
        self.pending.push((id, target_id));
        Object::Reference(target_id)
    }

    fn is_page_tree_node(&self, id: ObjectId) -> bool {
        self.backend
            .doc
            .get_dictionary(id)
            .and_then(|d| d.get(b"Type"))
            .and_then(Object::as_name)
            .map(|name| name == b"Pages" || name == b"Page")
            .unwrap_or(false)
    }

    /// Entries of a page's `/Annots` array, resolving an indirect array.
    fn annotations(&self, page: &'a Dictionary) -> Vec<&'a Object> {
        let backend: &'a LopdfBackend = self.backend;
        let annots = match page.get(b"Annots") {
            Ok(Object::Reference(id)) => backend.doc.get_object(*id).ok(),
            Ok(other) => Some(other),
            Err(_) => None,
        };
        annots
            .and_then(|a| a.as_array().ok())
            .map(|items| items.iter().collect())
            .unwrap_or_default()
    }

    /// Whether an annotation's destination cannot survive in the output:
    /// an explicit destination on a page left out, or a named destination
    /// whose name tree is not carried over.
    fn links_elsewhere(&self, annot: &Object) -> bool {
        let Some(dict) = self.resolve_dict(annot) else {
            return false;
        };
        let action = dict.get(b"A").ok().and_then(|a| self.resolve_dict(a));
        let dest = dict
            .get(b"Dest")
            .ok()
            .or_else(|| action.and_then(|a| a.get(b"D").ok()));
        match dest.map(|d| self.resolve(d)) {
            Some(Object::Array(items)) => match items.first() {
                Some(Object::Reference(page)) => !self.kept.contains_key(page),
                _ => false,
            },
            Some(Object::Name(_)) | Some(Object::String(..)) => true,
            _ => false,
        }
    }

    fn resolve<'o>(&'o self, object: &'o Object) -> &'o Object {
        match object {
            Object::Reference(id) => self.backend.doc.get_object(*id).unwrap_or(object),
            other => other,
        }
    }

    fn resolve_dict<'o>(&'o self, object: &'o Object) -> Option<&'o Dictionary> {
        self.resolve(object).as_dict().ok()
    }
}

/// Add an empty page of the given size under `parent`.
fn add_blank_page(doc: &mut LopdfDocument, parent: ObjectId, size: PageSize) -> ObjectId {
    let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
    let page: Dictionary = dictionary! {
        "Type" => "Page",
        "Parent" => parent,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(size.width),
            Object::Real(size.height),
        ],
        "Resources" => dictionary! {},
        "Contents" => content_id,
    };
    doc.add_object(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};

    fn build_pdf(pages: &[(&str, (i64, i64))]) -> Vec<u8> {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for (text, (w, h)) in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 72.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "MediaBox" => vec![0.into(), 0.into(), (*w).into(), (*h).into()],
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_rejects_non_pdf() {
        let result = LopdfBackend::from_bytes(b"definitely not a pdf");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_encrypted_document_is_rejected() {
        let data = build_pdf(&[("Page 1 of 1", (612, 792))]);
        let mut doc = LopdfDocument::load_mem(&data).unwrap();
        let encrypt_id = doc.add_object(dictionary! {
            "Filter" => "Standard",
            "V" => 1,
            "R" => 2,
        });
        doc.trailer.set("Encrypt", encrypt_id);

        assert!(matches!(
            LopdfBackend::from_document(doc),
            Err(Error::Encrypted)
        ));
    }

    #[test]
    fn test_page_count_and_size() {
        let data = build_pdf(&[("Page 1 of 2", (612, 792)), ("Page 2 of 2", (595, 842))]);
        let backend = LopdfBackend::from_bytes(&data).unwrap();

        assert_eq!(backend.page_count(), 2);
        assert_eq!(backend.page_size(0), Some(PageSize::LETTER));
        assert_eq!(backend.page_size(1), Some(PageSize::A4));
        assert_eq!(backend.page_size(2), None);
    }

    #[test]
    fn test_page_text_out_of_range() {
        let data = build_pdf(&[("Page 1 of 1", (612, 792))]);
        let backend = LopdfBackend::from_bytes(&data).unwrap();
        assert!(matches!(
            backend.page_text(3),
            Err(Error::PageOutOfRange(3, 1))
        ));
    }

    #[test]
    fn test_page_text_contains_footer() {
        let data = build_pdf(&[("Page 1 of 1", (612, 792))]);
        let backend = LopdfBackend::from_bytes(&data).unwrap();
        let text = backend.page_text(0).unwrap();
        assert!(text.contains("Page 1 of 1"));
    }

    #[test]
    fn test_serialize_subset_with_blank() {
        let data = build_pdf(&[
            ("Page 1 of 1", (612, 792)),
            ("Page 1 of 1", (595, 842)),
            ("Page 1 of 1", (612, 792)),
        ]);
        let backend = LopdfBackend::from_bytes(&data).unwrap();

        let mut out = OutputDocument::new();
        out.append_page(1, Some(PageSize::A4));
        out.append_blank_page(PageSize::A4);
        let bytes = backend.serialize(&out).unwrap();

        let written = LopdfBackend::from_bytes(&bytes).unwrap();
        assert_eq!(written.page_count(), 2);
        assert_eq!(written.page_size(0), Some(PageSize::A4));
        assert_eq!(written.page_size(1), Some(PageSize::A4));
        assert_eq!(written.page_text(1).unwrap().trim(), "");
    }
}
