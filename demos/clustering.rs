//! DBSCAN on a small 2D dataset, printing labels, centroids and inertia.
//!
//! Run with `RUST_LOG=reach=debug cargo run --example clustering` to see the
//! fit events.

use reach::{Dbscan, DbscanParams, MetricKind, NOISE};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Three well-separated clusters in 2D plus two outliers.
    let data: Vec<Vec<f32>> = vec![
        // Cluster A (near origin)
        vec![0.0, 0.0],
        vec![0.1, 0.2],
        vec![0.2, 0.1],
        vec![-0.1, 0.1],
        // Cluster B (near (5, 5))
        vec![5.0, 5.0],
        vec![5.1, 4.9],
        vec![4.9, 5.1],
        vec![5.2, 5.2],
        // Cluster C (near (10, 0))
        vec![10.0, 0.0],
        vec![10.1, 0.1],
        vec![9.9, -0.1],
        vec![10.2, 0.2],
        // Outliers
        vec![2.5, 7.5],
        vec![7.5, -5.0],
    ];

    let configs = [
        DbscanParams {
            eps: 1.0,
            min_samples: 2,
            ..Default::default()
        },
        DbscanParams {
            eps: 0.3,
            min_samples: 3,
            metric: MetricKind::Manhattan,
            ..Default::default()
        },
        DbscanParams {
            eps: 1.0,
            min_samples: 3,
            metric: MetricKind::Minkowski,
            p: 3.0,
            parallel: true,
        },
    ];

    for params in &configs {
        let fit = Dbscan::from_params(params)?.fit(&data)?;

        println!(
            "\n=== DBSCAN (eps={}, min_samples={}, metric={:?}) ===",
            params.eps, params.min_samples, params.metric
        );
        for (i, &label) in fit.labels().iter().enumerate() {
            let tag = if label == NOISE {
                "NOISE".to_string()
            } else {
                format!("cluster {}", label)
            };
            let core = if fit.is_core(i) == Some(true) { " (core)" } else { "" };
            println!(
                "  point {:2} ({:5.1}, {:5.1}) => {}{}",
                i, data[i][0], data[i][1], tag, core
            );
        }
        for (id, centroid) in fit.centroids().iter().enumerate() {
            println!(
                "  centroid {}: ({:.3}, {:.3}) with {} points",
                id,
                centroid[0],
                centroid[1],
                fit.cluster_sizes()[id]
            );
        }
        println!(
            "  clusters={} noise={} inertia={:.4}",
            fit.n_clusters(),
            fit.n_noise(),
            fit.inertia()
        );
    }

    Ok(())
}
