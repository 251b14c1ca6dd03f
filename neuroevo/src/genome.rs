use rand::Rng;

/// An interface for genomes that can be evolved
/// by an [`EvolutionalTrainer`].
///
/// Deep copies are made through `Clone`, which
/// should copy every parameter of the genome:
/// the trainer clones elites to produce offspring
/// and mutates the clones in place.
///
/// [`EvolutionalTrainer`]: crate::EvolutionalTrainer
pub trait Evolvable: Clone {
    /// Replaces every parameter of the genome with an
    /// independent uniform sample in `[-range, range]`.
    ///
    /// Used for seeding a population, not for
    /// incremental perturbation.
    fn randomize<R: Rng + ?Sized>(&mut self, range: f64, rng: &mut R);

    /// Perturbs every parameter `x` of the genome by a
    /// signed amount of at most `mutation_rate * |x|`.
    ///
    /// A `mutation_rate` of 0 must leave the genome unchanged.
    fn mutate<R: Rng + ?Sized>(&mut self, mutation_rate: f64, rng: &mut R);
}
