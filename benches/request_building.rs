use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use shipping_calc::params::from_value;
use shipping_calc::{DhlRequest, FreightQuoteRequest};

// Validation plus document rendering, i.e. everything a quote does before the network
pub fn request_building_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_building");

    let dhl_params = from_value(json!({
        "api_user": "user",
        "api_password": "secret",
        "shipping_key": "KEY123",
        "account_num": "987654",
        "date": "2008-05-05",
        "service_code": "E",
        "shipment_code": "P",
        "weight": 34,
        "to_zip": 10001,
        "to_state": "NY",
    }));

    let fq_params = from_value(json!({
        "api_email": "xmltest@FreightQuote.com",
        "api_password": "XML",
        "from_zip": 75042,
        "to_zip": 33166,
        "weight": 5,
        "dimensions": "1x1x1",
        "to_conditions": "BIZ_WITHOUT",
        "liftgate": true,
    }));

    group.bench_function("dhl", |b| {
        b.iter(|| {
            let request = DhlRequest::from_params(dhl_params.as_ref()).unwrap();
            black_box(request.to_xml().unwrap())
        })
    });

    group.bench_function("freight_quote", |b| {
        b.iter(|| {
            let request = FreightQuoteRequest::from_params(fq_params.as_ref()).unwrap();
            black_box(request.to_xml().unwrap())
        })
    });

    group.finish();
}

criterion_group!(benches, request_building_benchmark);
criterion_main!(benches);
