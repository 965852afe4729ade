use arbitrary::unstructured::Unstructured;
use rand::{prelude::random, rngs::StdRng, Rng, SeedableRng};
use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use std::time;

use rbmap::RbMap;

/// Command line options.
#[derive(Clone, StructOpt)]
pub struct Opt {
    #[structopt(long = "seed")]
    seed: Option<u64>,

    #[structopt(long = "loads", default_value = "1000000")] // default 1M
    loads: usize,

    #[structopt(long = "sets", default_value = "0")]
    sets: usize,

    #[structopt(long = "dels", default_value = "0")]
    dels: usize,

    #[structopt(long = "gets", default_value = "0")]
    gets: usize,

    #[structopt(long = "validate")]
    validate: bool,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let opts = Opt::from_args();
    let seed = opts.seed.unwrap_or_else(random);
    info!(seed, "perf");
    let mut rng = StdRng::seed_from_u64(seed);

    let mut index: RbMap<u64, u64> = RbMap::new();

    // initial load
    let start = time::Instant::now();
    for _i in 0..opts.loads {
        let (key, val): (u64, u64) = (rng.gen(), rng.gen());
        index.insert(key, val).unwrap();
    }
    info!("loaded {} items in {:?}", opts.loads, start.elapsed());

    do_incremental(&mut rng, &opts, &mut index);

    let start = time::Instant::now();
    let n = index.iter().count();
    info!("iterating {} items, took {:?}", n, start.elapsed());

    if opts.validate {
        let start = time::Instant::now();
        match index.validate() {
            Ok(()) => info!("validated {} items in {:?}", n, start.elapsed()),
            Err(err) => panic!("{}", err),
        }
    }
}

fn do_incremental(rng: &mut StdRng, opts: &Opt, index: &mut RbMap<u64, u64>) {
    let total = opts.sets + opts.dels + opts.gets;
    if total == 0 {
        return;
    }

    let start = time::Instant::now();
    let mut counts = [0_usize; 3];
    let mut n = total;
    while n > 0 {
        let bytes = rng.gen::<[u8; 32]>();
        let mut uns = Unstructured::new(&bytes);
        let (key, val): (u64, u64) = uns.arbitrary().unwrap();

        let op = rng.gen::<usize>() % total;
        if op < opts.sets {
            counts[0] += 1;
            index.set(key, val).unwrap();
        } else if op < (opts.sets + opts.dels) {
            counts[1] += 1;
            index.remove(&key);
        } else {
            counts[2] += 1;
            index.get(&key);
        }
        n -= 1;
    }
    info!(
        "incremental sets:{} dels:{} gets:{}, took {:?}",
        counts[0],
        counts[1],
        counts[2],
        start.elapsed()
    );
}
