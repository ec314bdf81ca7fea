//! RDF, RDFS, OWL and XSD vocabulary used by class-property derivation.

use crate::dictionary::TermDictionary;
use crate::error::GraphResult;
use crate::term::NodeId;

pub mod rdf {
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
    pub const PROPERTY: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property";
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
}

pub mod rdfs {
    pub const NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    pub const SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
    pub const SUB_PROPERTY_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subPropertyOf";
    pub const DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";
    pub const RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    pub const COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
    pub const CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";
}

pub mod owl {
    pub const NS: &str = "http://www.w3.org/2002/07/owl#";
    pub const THING: &str = "http://www.w3.org/2002/07/owl#Thing";
    pub const CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
    pub const RESTRICTION: &str = "http://www.w3.org/2002/07/owl#Restriction";
    pub const EQUIVALENT_CLASS: &str = "http://www.w3.org/2002/07/owl#equivalentClass";
    pub const INTERSECTION_OF: &str = "http://www.w3.org/2002/07/owl#intersectionOf";
    pub const UNION_OF: &str = "http://www.w3.org/2002/07/owl#unionOf";
    pub const ON_PROPERTY: &str = "http://www.w3.org/2002/07/owl#onProperty";
    pub const ON_PROPERTIES: &str = "http://www.w3.org/2002/07/owl#onProperties";
    pub const ON_CLASS: &str = "http://www.w3.org/2002/07/owl#onClass";
    pub const ON_DATA_RANGE: &str = "http://www.w3.org/2002/07/owl#onDataRange";
    pub const SOME_VALUES_FROM: &str = "http://www.w3.org/2002/07/owl#someValuesFrom";
    pub const ALL_VALUES_FROM: &str = "http://www.w3.org/2002/07/owl#allValuesFrom";
    pub const PROPERTY_CHAIN_AXIOM: &str = "http://www.w3.org/2002/07/owl#propertyChainAxiom";
    pub const OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";
    pub const DATATYPE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#DatatypeProperty";
    pub const ANNOTATION_PROPERTY: &str = "http://www.w3.org/2002/07/owl#AnnotationProperty";
}

pub mod xsd {
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
}

/// Vocabulary nodes interned in one dictionary.
///
/// Resolved once per derivation instance; every field is a plain id so the
/// traversal compares integers only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    pub rdf_type: NodeId,
    pub first: NodeId,
    pub rest: NodeId,
    pub nil: NodeId,
    pub rdf_property: NodeId,
    pub sub_class_of: NodeId,
    pub sub_property_of: NodeId,
    pub domain: NodeId,
    pub range: NodeId,
    pub label: NodeId,
    pub comment: NodeId,
    pub rdfs_class: NodeId,
    pub thing: NodeId,
    pub owl_class: NodeId,
    pub restriction: NodeId,
    pub equivalent_class: NodeId,
    pub intersection_of: NodeId,
    pub union_of: NodeId,
    pub on_property: NodeId,
    pub on_properties: NodeId,
    pub on_class: NodeId,
    pub on_data_range: NodeId,
    pub some_values_from: NodeId,
    pub all_values_from: NodeId,
    pub property_chain_axiom: NodeId,
    pub object_property: NodeId,
    pub datatype_property: NodeId,
    pub annotation_property: NodeId,
}

impl Vocabulary {
    /// Intern every vocabulary IRI in `dictionary`.
    pub fn resolve(dictionary: &TermDictionary) -> GraphResult<Self> {
        Ok(Self {
            rdf_type: dictionary.iri(rdf::TYPE)?,
            first: dictionary.iri(rdf::FIRST)?,
            rest: dictionary.iri(rdf::REST)?,
            nil: dictionary.iri(rdf::NIL)?,
            rdf_property: dictionary.iri(rdf::PROPERTY)?,
            sub_class_of: dictionary.iri(rdfs::SUB_CLASS_OF)?,
            sub_property_of: dictionary.iri(rdfs::SUB_PROPERTY_OF)?,
            domain: dictionary.iri(rdfs::DOMAIN)?,
            range: dictionary.iri(rdfs::RANGE)?,
            label: dictionary.iri(rdfs::LABEL)?,
            comment: dictionary.iri(rdfs::COMMENT)?,
            rdfs_class: dictionary.iri(rdfs::CLASS)?,
            thing: dictionary.iri(owl::THING)?,
            owl_class: dictionary.iri(owl::CLASS)?,
            restriction: dictionary.iri(owl::RESTRICTION)?,
            equivalent_class: dictionary.iri(owl::EQUIVALENT_CLASS)?,
            intersection_of: dictionary.iri(owl::INTERSECTION_OF)?,
            union_of: dictionary.iri(owl::UNION_OF)?,
            on_property: dictionary.iri(owl::ON_PROPERTY)?,
            on_properties: dictionary.iri(owl::ON_PROPERTIES)?,
            on_class: dictionary.iri(owl::ON_CLASS)?,
            on_data_range: dictionary.iri(owl::ON_DATA_RANGE)?,
            some_values_from: dictionary.iri(owl::SOME_VALUES_FROM)?,
            all_values_from: dictionary.iri(owl::ALL_VALUES_FROM)?,
            property_chain_axiom: dictionary.iri(owl::PROPERTY_CHAIN_AXIOM)?,
            object_property: dictionary.iri(owl::OBJECT_PROPERTY)?,
            datatype_property: dictionary.iri(owl::DATATYPE_PROPERTY)?,
            annotation_property: dictionary.iri(owl::ANNOTATION_PROPERTY)?,
        })
    }

    /// The properties every individual has through the top class.
    pub fn builtin_properties(&self) -> [NodeId; 2] {
        [self.label, self.comment]
    }

    /// Whether `class` is one of the property-type classes.
    pub fn is_property_type(&self, class: NodeId) -> bool {
        class == self.object_property
            || class == self.datatype_property
            || class == self.annotation_property
            || class == self.rdf_property
    }
}
