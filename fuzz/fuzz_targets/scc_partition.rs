#![no_main]

use dagsched_core::{Graph, find_sccs, topo};
use libfuzzer_sys::fuzz_target;

// First byte picks the vertex count, then each (u, v, w) byte triple is an edge.
fuzz_target!(|data: &[u8]| {
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let n = usize::from(first % 64) + 1;
    let mut graph = Graph::directed(n);
    for chunk in rest.chunks_exact(3) {
        let u = usize::from(chunk[0]) % n;
        let v = usize::from(chunk[1]) % n;
        let w = i64::from(chunk[2] as i8);
        graph.add_edge(u, v, w).expect("endpoints reduced mod n");
    }

    let sccs = find_sccs(&graph);
    let mut seen = vec![false; n];
    for (id, members) in sccs.components().iter().enumerate() {
        assert!(!members.is_empty());
        for &v in members {
            assert!(!seen[v], "vertex {v} in two components");
            seen[v] = true;
            assert_eq!(sccs.component_of(v), Some(id));
        }
    }
    assert!(seen.iter().all(|&s| s), "partition misses a vertex");

    let dag = sccs.condensation(&graph).expect("partition is valid");
    assert_eq!(dag.vertex_count(), sccs.component_count());
    let order = topo::sort(&dag);
    assert!(!order.has_cycle, "condensation has a cycle");
    assert!(order.is_complete(dag.vertex_count()));
});
