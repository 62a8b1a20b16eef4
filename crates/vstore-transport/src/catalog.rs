//! Session-lifetime catalog of class definitions.
//!
//! Classes are append-only and change far less often than entities, so the
//! catalog reads the whole class range once and answers every later lookup
//! from memory.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::debug;
use vstore_store::{ObjectStore, StoreError, StoreResult};
use vstore_types::{Class, ClassId, IdRange};

/// Loaded class set with name and id indexes.
#[derive(Debug, Default)]
struct ClassIndex {
    classes: Vec<Class>,
    by_name: HashMap<String, usize>,
    by_id: HashMap<ClassId, usize>,
}

impl ClassIndex {
    fn new(classes: Vec<Class>) -> Self {
        let mut by_name = HashMap::with_capacity(classes.len());
        let mut by_id = HashMap::with_capacity(classes.len());
        for (i, class) in classes.iter().enumerate() {
            // First definition wins if a name is ever reused.
            by_name.entry(class.name.clone()).or_insert(i);
            by_id.insert(class.id, i);
        }
        Self {
            classes,
            by_name,
            by_id,
        }
    }
}

/// Memoized view of every class in the store.
pub struct ClassCatalog {
    store: Arc<dyn ObjectStore>,
    first_id: ClassId,
    cacheable: BTreeSet<String>,
    index: OnceCell<ClassIndex>,
}

impl ClassCatalog {
    pub fn new(store: Arc<dyn ObjectStore>, first_id: ClassId, cacheable: BTreeSet<String>) -> Self {
        Self {
            store,
            first_id,
            cacheable,
            index: OnceCell::new(),
        }
    }

    async fn index(&self) -> StoreResult<&ClassIndex> {
        self.index
            .get_or_try_init(|| async {
                let next = self.store.next_class_id().await?;
                let ids: Vec<ClassId> = IdRange::new(self.first_id, next).collect();
                let fetched = if ids.is_empty() {
                    Vec::new()
                } else {
                    self.store.classes_by_ids(&ids).await?
                };
                let classes: Vec<Class> = fetched.into_iter().flatten().collect();
                debug!(requested = ids.len(), loaded = classes.len(), "class catalog loaded");
                Ok::<_, StoreError>(ClassIndex::new(classes))
            })
            .await
    }

    /// Every class in ascending id order. Fetched once per catalog.
    pub async fn load_all_classes(&self) -> StoreResult<&[Class]> {
        Ok(&self.index().await?.classes)
    }

    pub fn is_loaded(&self) -> bool {
        self.index.initialized()
    }

    pub async fn class_by_name(&self, name: &str) -> StoreResult<Option<&Class>> {
        let index = self.index().await?;
        Ok(index.by_name.get(name).map(|&i| &index.classes[i]))
    }

    pub async fn class_by_id(&self, id: ClassId) -> StoreResult<Option<&Class>> {
        let index = self.index().await?;
        Ok(index.by_id.get(&id).map(|&i| &index.classes[i]))
    }

    pub async fn class_id_by_name_map(&self) -> StoreResult<BTreeMap<String, ClassId>> {
        let index = self.index().await?;
        Ok(index
            .by_name
            .iter()
            .map(|(name, &i)| (name.clone(), index.classes[i].id))
            .collect())
    }

    /// Whether entities of the named class may be served from cache.
    pub fn is_cacheable(&self, class_name: &str) -> bool {
        self.cacheable.contains(class_name)
    }

    /// Ids of the cacheable classes present in the store. Allow-listed names
    /// with no matching class are skipped.
    pub async fn cacheable_class_ids(&self) -> StoreResult<HashSet<ClassId>> {
        let index = self.index().await?;
        Ok(self
            .cacheable
            .iter()
            .filter_map(|name| index.by_name.get(name.as_str()))
            .map(|&i| index.classes[i].id)
            .collect())
    }
}

impl std::fmt::Debug for ClassCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassCatalog")
            .field("first_id", &self.first_id)
            .field("cacheable", &self.cacheable)
            .field("classes", &self.index.get().map(|i| i.classes.len()))
            .finish()
    }
}
