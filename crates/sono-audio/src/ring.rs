/// Anneau borné d'échantillons mono.
///
/// Capacité fixe ; une fois plein, chaque nouvel échantillon écrase le plus
/// ancien, si bien que l'anneau retient toujours les `capacity` échantillons
/// les plus récents. L'ajout se fait par copies de segments contigus, jamais
/// par décalage linéaire du contenu — le producteur temps réel paie O(n)
/// copies pour n échantillons, rien de plus.
///
/// # Example
/// ```
/// use sono_audio::ring::SampleRing;
///
/// let mut ring = SampleRing::new(4);
/// ring.push_slice(&[1.0, 2.0, 3.0]);
/// ring.push_slice(&[4.0, 5.0]); // 5 échantillons au total, le plus ancien cède
/// assert_eq!(ring.drain(), vec![2.0, 3.0, 4.0, 5.0]);
/// assert!(ring.is_empty());
/// ```
pub struct SampleRing {
    buf: Vec<f32>,
    capacity: usize,
    /// Position de la prochaine écriture (modulo `capacity`).
    write_pos: usize,
    /// Nombre d'échantillons valides (≤ `capacity`).
    len: usize,
}

impl SampleRing {
    /// Anneau de `capacity` échantillons.
    ///
    /// # Panics
    /// Panics if `capacity` is 0.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring capacity must be > 0");
        Self {
            buf: vec![0.0; capacity],
            capacity,
            write_pos: 0,
            len: 0,
        }
    }

    /// Anneau retenant une seconde d'audio à `sample_rate` Hz.
    ///
    /// # Panics
    /// Panics if `sample_rate` is 0.
    #[must_use]
    pub fn for_one_second(sample_rate: u32) -> Self {
        Self::new(sample_rate as usize)
    }

    /// Ajoute un échantillon, en écrasant le plus ancien si l'anneau est
    /// plein.
    #[inline(always)]
    pub fn push(&mut self, sample: f32) {
        self.buf[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.capacity;
        if self.len < self.capacity {
            self.len += 1;
        }
    }

    /// Ajoute une tranche d'échantillons, plus anciens en premier.
    ///
    /// Au plus deux copies contiguës : une jusqu'au bord de l'anneau, une
    /// après le rebouclage. Une tranche plus longue que la capacité remplace
    /// tout le contenu par sa fin — les échantillons excédentaires sont morts
    /// à l'arrivée.
    pub fn push_slice(&mut self, samples: &[f32]) {
        if samples.len() >= self.capacity {
            let tail = &samples[samples.len() - self.capacity..];
            self.buf.copy_from_slice(tail);
            self.write_pos = 0;
            self.len = self.capacity;
            return;
        }

        let first = samples.len().min(self.capacity - self.write_pos);
        self.buf[self.write_pos..self.write_pos + first].copy_from_slice(&samples[..first]);
        let wrapped = samples.len() - first;
        if wrapped > 0 {
            self.buf[..wrapped].copy_from_slice(&samples[first..]);
        }

        self.write_pos = (self.write_pos + samples.len()) % self.capacity;
        self.len = (self.len + samples.len()).min(self.capacity);
    }

    /// Prend tous les échantillons en ordre chronologique et vide l'anneau.
    ///
    /// Un second appel sans écriture intermédiaire retourne un vecteur vide.
    pub fn drain(&mut self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.len);
        if self.len == self.capacity {
            // full ring: the oldest sample sits where the next write would land
            out.extend_from_slice(&self.buf[self.write_pos..]);
            out.extend_from_slice(&self.buf[..self.write_pos]);
        } else {
            // never wrapped: contents start at index 0
            out.extend_from_slice(&self.buf[..self.len]);
        }
        self.clear();
        out
    }

    /// Jette le contenu sans le retourner.
    pub fn clear(&mut self) {
        self.write_pos = 0;
        self.len = 0;
    }

    /// Nombre d'échantillons retenus.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` si l'anneau ne retient rien.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Capacité maximale en échantillons.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Durée retenue en secondes pour un flux mono à `sample_rate` Hz.
    #[must_use]
    pub fn duration_secs(&self, sample_rate: u32) -> f32 {
        if sample_rate == 0 {
            return 0.0;
        }
        self.len as f32 / sample_rate as f32
    }
}
