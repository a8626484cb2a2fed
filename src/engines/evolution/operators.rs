use crate::config::evolution::{CrossoverMethod, SelectionStrategy};
use crate::genome::{Genome, TraitVector, TRAIT_COUNT};
use rand::Rng;
use rand_distr::{Distribution, Normal};

fn fitness_of(genome: &Genome) -> f64 {
    genome.fitness.unwrap_or(f64::MIN)
}

/// Deterministic top-K by fitness, ids breaking ties.
pub fn elite_selection(population: &[Genome], count: usize) -> Vec<Genome> {
    let mut sorted: Vec<&Genome> = population.iter().collect();
    sorted.sort_by(|a, b| {
        fitness_of(b)
            .partial_cmp(&fitness_of(a))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.id().cmp(&b.id()))
    });
    sorted.into_iter().take(count).cloned().collect()
}

/// Tournament selection: each slot is the best of `tournament_size`
/// candidates sampled without replacement. Size 1 degenerates to uniform
/// random selection.
pub fn tournament_selection<R: Rng>(
    population: &[Genome],
    count: usize,
    tournament_size: usize,
    rng: &mut R,
) -> Vec<Genome> {
    if tournament_size > population.len() {
        log::warn!(
            "tournament size {} exceeds population {}; falling back to elite selection",
            tournament_size,
            population.len()
        );
        return elite_selection(population, count);
    }

    let mut pool = Vec::with_capacity(count);
    for _ in 0..count {
        let entrants = rand::seq::index::sample(rng, population.len(), tournament_size);
        let winner = entrants
            .iter()
            .max_by(|&a, &b| {
                fitness_of(&population[a])
                    .partial_cmp(&fitness_of(&population[b]))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap();
        pool.push(population[winner].clone());
    }
    pool
}

/// Fitness-proportionate sampling; fitnesses are shifted non-negative
/// before use as weights. A zero total degenerates to uniform picks.
pub fn roulette_selection<R: Rng>(
    population: &[Genome],
    count: usize,
    rng: &mut R,
) -> Vec<Genome> {
    if population.is_empty() {
        return Vec::new();
    }

    let min_fitness = population
        .iter()
        .map(fitness_of)
        .fold(f64::INFINITY, f64::min);
    let weights: Vec<f64> = population
        .iter()
        .map(|g| fitness_of(g) - min_fitness)
        .collect();
    let total: f64 = weights.iter().sum();

    let mut pool = Vec::with_capacity(count);
    for _ in 0..count {
        if total <= 0.0 {
            pool.push(population[rng.gen_range(0..population.len())].clone());
            continue;
        }

        let mut spin = rng.gen::<f64>() * total;
        let mut chosen = population.len() - 1;
        for (i, w) in weights.iter().enumerate() {
            spin -= w;
            if spin <= 0.0 {
                chosen = i;
                break;
            }
        }
        pool.push(population[chosen].clone());
    }
    pool
}

/// Greedy parent set maximizing summed pairwise trait distance over
/// candidates at or above the fitness floor.
pub fn diversity_selection(
    population: &[Genome],
    count: usize,
    min_fitness: f64,
) -> Vec<Genome> {
    let candidates: Vec<&Genome> = population
        .iter()
        .filter(|g| g.fitness.map(|f| f >= min_fitness).unwrap_or(false))
        .collect();

    if candidates.len() < count {
        log::warn!(
            "diversity selection found {} candidates for a pool of {}; falling back to elite selection",
            candidates.len(),
            count
        );
        return elite_selection(population, count);
    }

    let mut selected: Vec<&Genome> = Vec::with_capacity(count);

    // Seed with the fittest candidate, then grow by farthest-sum.
    let seed = candidates
        .iter()
        .max_by(|a, b| {
            fitness_of(a)
                .partial_cmp(&fitness_of(b))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.id().cmp(&a.id()))
        })
        .unwrap();
    selected.push(seed);

    while selected.len() < count {
        let next = candidates
            .iter()
            .filter(|c| !selected.iter().any(|s| s.id() == c.id()))
            .max_by(|a, b| {
                let da: f64 = selected.iter().map(|s| s.distance(a)).sum();
                let db: f64 = selected.iter().map(|s| s.distance(b)).sum();
                da.partial_cmp(&db)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(b.id().cmp(&a.id()))
            })
            .unwrap();
        selected.push(next);
    }

    selected.into_iter().cloned().collect()
}

/// Strategy dispatch. Underfilled pools fall back to elite selection
/// inside the individual strategies; this never fails.
pub fn select_parents<R: Rng>(
    strategy: SelectionStrategy,
    population: &[Genome],
    count: usize,
    tournament_size: usize,
    diversity_min_fitness: f64,
    rng: &mut R,
) -> Vec<Genome> {
    match strategy {
        SelectionStrategy::Elite => elite_selection(population, count),
        SelectionStrategy::Tournament => {
            tournament_selection(population, count, tournament_size, rng)
        }
        SelectionStrategy::Roulette => roulette_selection(population, count, rng),
        SelectionStrategy::Diversity => {
            diversity_selection(population, count, diversity_min_fitness)
        }
    }
}

/// Child trait vector from two parents.
pub fn crossover<R: Rng>(
    method: CrossoverMethod,
    parent_a: &Genome,
    parent_b: &Genome,
    blend_alpha: f64,
    rng: &mut R,
) -> TraitVector {
    let a = parent_a.traits();
    let b = parent_b.traits();

    match method {
        CrossoverMethod::Uniform => {
            std::array::from_fn(|i| if rng.gen_bool(0.5) { a[i] } else { b[i] })
        }
        CrossoverMethod::Weighted => {
            // Shift fitness non-negative so the weights are usable even
            // when scores are degenerate.
            let fa = parent_a.fitness.unwrap_or(0.0);
            let fb = parent_b.fitness.unwrap_or(0.0);
            let shift = fa.min(fb).min(0.0);
            let (wa, wb) = (fa - shift, fb - shift);
            let total = wa + wb;
            let weight_a = if total > 0.0 { wa / total } else { 0.5 };
            std::array::from_fn(|i| weight_a * a[i] + (1.0 - weight_a) * b[i])
        }
        CrossoverMethod::Blend => std::array::from_fn(|i| {
            let lo = a[i].min(b[i]);
            let hi = a[i].max(b[i]);
            let span = hi - lo;
            if span == 0.0 {
                lo
            } else {
                rng.gen_range((lo - blend_alpha * span)..(hi + blend_alpha * span))
            }
        }),
        CrossoverMethod::SinglePoint => {
            let point = rng.gen_range(1..TRAIT_COUNT);
            std::array::from_fn(|i| if i < point { a[i] } else { b[i] })
        }
    }
}

/// Birth-time mutation: each trait perturbed by Gaussian noise with
/// probability `mutation_rate`, clamped to [0, 1] and logged on the
/// genome.
pub fn mutate<R: Rng>(genome: &mut Genome, mutation_rate: f64, mutation_strength: f64, rng: &mut R) {
    let Ok(noise) = Normal::new(0.0, mutation_strength) else {
        return;
    };

    for trait_index in 0..TRAIT_COUNT {
        if rng.gen::<f64>() < mutation_rate {
            let delta = noise.sample(rng);
            genome.apply_mutation(trait_index, delta);
        }
    }
}
