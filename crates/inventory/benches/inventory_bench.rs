use common::{ProductId, ProductSkuId, StoreId};
use criterion::{Criterion, criterion_group, criterion_main};
use inventory::{InMemoryInventoryProvider, ProductInventoryProvider};

fn bench_uncontended_reserve(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let provider = InMemoryInventoryProvider::new();
    let store_id = StoreId::new();
    let product_id = ProductId::new();
    let sku_id = ProductSkuId::new();
    provider.set_stock(None, store_id, product_id, sku_id, u32::MAX);

    c.bench_function("inventory/uncontended_reserve", |b| {
        b.iter(|| {
            rt.block_on(async {
                provider
                    .try_reduce(None, store_id, product_id, sku_id, 1)
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_contended_reserve(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let provider = InMemoryInventoryProvider::new();
    let store_id = StoreId::new();
    let product_id = ProductId::new();
    let sku_id = ProductSkuId::new();

    c.bench_function("inventory/contended_reserve_32_tasks", |b| {
        b.iter(|| {
            rt.block_on(async {
                provider.set_stock(None, store_id, product_id, sku_id, 16);

                let mut handles = Vec::new();
                for _ in 0..32 {
                    let provider = provider.clone();
                    handles.push(tokio::spawn(async move {
                        provider
                            .try_reduce(None, store_id, product_id, sku_id, 1)
                            .await
                            .unwrap()
                    }));
                }
                for handle in handles {
                    handle.await.unwrap();
                }
            });
        });
    });
}

criterion_group!(benches, bench_uncontended_reserve, bench_contended_reserve);
criterion_main!(benches);
