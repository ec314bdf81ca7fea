//! Benchmarks for class-property derivation and the cached index.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use ontoindex::config::IndexConfig;
use ontoindex::graph::Graph;
use ontoindex::graph::io::load_turtle;
use ontoindex::ontology::{OwlDerivation, PropertyDerivation, owl_class_index};
use ontoindex::prefix::{PrefixLibrary, attach_auto_prefix};

/// A subclass chain `C0 ⊑ C1 ⊑ ... ⊑ Cn` with one domain property per class.
fn chain_ontology(depth: usize) -> String {
    let mut ttl = String::from(
        "@prefix ex: <http://ex.com#> .\n\
         @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n",
    );
    for i in 0..depth {
        ttl.push_str(&format!("ex:C{i} rdfs:subClassOf ex:C{} .\n", i + 1));
        ttl.push_str(&format!("ex:p{i} rdfs:domain ex:C{i} .\n"));
    }
    ttl
}

fn bench_derivation(c: &mut Criterion) {
    let mut graph = Graph::new();
    load_turtle(&mut graph, &chain_ontology(200)).unwrap();
    let derivation = OwlDerivation::new(&graph, &IndexConfig::default()).unwrap();
    let leaf = graph.iri("http://ex.com#C0").unwrap();

    c.bench_function("derive_chain_200", |bench| {
        bench.iter(|| black_box(derivation.class_properties(&graph, leaf)))
    });
}

fn bench_cached_lookup(c: &mut Criterion) {
    let mut graph = Graph::new();
    load_turtle(&mut graph, &chain_ontology(200)).unwrap();
    let index = owl_class_index(&mut graph, &IndexConfig::default()).unwrap();
    let leaf = graph.iri("http://ex.com#C0").unwrap();
    index.class_properties(&graph, leaf).unwrap();

    c.bench_function("cached_lookup_chain_200", |bench| {
        bench.iter(|| black_box(index.class_properties(&graph, leaf).unwrap()))
    });
}

fn bench_load_with_listeners(c: &mut Criterion) {
    let ttl = chain_ontology(200);

    c.bench_function("load_chain_200_with_listeners", |bench| {
        bench.iter(|| {
            let mut graph = Graph::new();
            owl_class_index(&mut graph, &IndexConfig::default()).unwrap();
            attach_auto_prefix(&mut graph, PrefixLibrary::well_known());
            black_box(load_turtle(&mut graph, &ttl).unwrap())
        })
    });
}

criterion_group!(
    benches,
    bench_derivation,
    bench_cached_lookup,
    bench_load_with_listeners
);
criterion_main!(benches);
