use indexmap::IndexMap;

/// A parsed schema document. Parsing the document format is a collaborator's
/// job; the compiler consumes this tree as given.
///
/// Every map is an [`IndexMap`] so declaration order survives into the
/// generated source: grouping and field enumeration must be byte-identical
/// across runs.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub tables: Vec<TableDef>,
}

impl Schema {
    pub fn new(tables: Vec<TableDef>) -> Self {
        Self { tables }
    }
}

/// One table declaration: named partitions, optional GSIs, and models.
#[derive(Debug, Clone)]
pub struct TableDef {
    pub name: String,
    /// Partition name → ordered key component list.
    pub partitions: IndexMap<String, Vec<String>>,
    /// GSI name → key attribute choice.
    pub gsis: IndexMap<String, GsiDef>,
    /// Model name → definition.
    pub models: IndexMap<String, ModelDef>,
}

impl TableDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            partitions: IndexMap::new(),
            gsis: IndexMap::new(),
            models: IndexMap::new(),
        }
    }

    pub fn partition<const N: usize>(mut self, name: impl Into<String>, components: [&str; N]) -> Self {
        self.partitions.insert(
            name.into(),
            components.iter().map(|component| component.to_string()).collect(),
        );
        self
    }

    pub fn gsi(
        mut self,
        name: impl Into<String>,
        partition: impl Into<String>,
        sort: impl Into<String>,
    ) -> Self {
        self.gsis.insert(
            name.into(),
            GsiDef {
                partition: partition.into(),
                sort: sort.into(),
            },
        );
        self
    }

    pub fn model(mut self, name: impl Into<String>, model: ModelDef) -> Self {
        self.models.insert(name.into(), model);
        self
    }
}

/// A GSI declaration: which attributes serve as its key pair.
#[derive(Debug, Clone)]
pub struct GsiDef {
    pub partition: String,
    pub sort: String,
}

/// A model declaration: its partition reference, sort component list, and
/// typed fields.
#[derive(Debug, Clone)]
pub struct ModelDef {
    pub partition: String,
    pub sort: Vec<String>,
    /// Field name → schema type token (`string`, `number`, `boolean`).
    pub fields: IndexMap<String, String>,
}

impl ModelDef {
    pub fn new(partition: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: Vec::new(),
            fields: IndexMap::new(),
        }
    }

    pub fn sort<const N: usize>(mut self, components: [&str; N]) -> Self {
        self.sort = components.iter().map(|component| component.to_string()).collect();
        self
    }

    pub fn field(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.fields.insert(name.into(), ty.into());
        self
    }
}
