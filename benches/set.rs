use criterion::{Criterion, criterion_group, criterion_main};

fn insert(c: &mut Criterion) {
    let mut set = carmine::OrderedSet::<usize>::new();
    c.bench_function("carmine_insert", |b| {
        b.iter(|| {
            for k in 0..100 {
                set.insert(k);
            }
        })
    });
    let mut tree = rbtree::RBTree::<usize, ()>::new();
    c.bench_function("rbtree_insert", |b| {
        b.iter(|| {
            for k in 0..100 {
                tree.insert(k, ());
            }
        })
    });
}

fn insert_remove(c: &mut Criterion) {
    c.bench_function("carmine_insert_remove", |b| {
        b.iter(|| {
            let mut set = carmine::OrderedSet::<usize>::new();
            for k in 0..100 {
                set.insert(k);
            }
            for k in 0..100 {
                set.remove(&k);
            }
        })
    });
}

criterion_group!(benches, insert, insert_remove);
criterion_main!(benches);
