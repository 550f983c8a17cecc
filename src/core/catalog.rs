use crate::domain::model::ServerDescriptor;
use rand::seq::SliceRandom;
use rand::Rng;

/// 打亂順序後回傳新的序列，不修改輸入
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

/// 程式啟動時固定的候選伺服器清單
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerCatalog {
    servers: Vec<ServerDescriptor>,
}

impl ServerCatalog {
    pub fn new(servers: Vec<ServerDescriptor>) -> Self {
        Self { servers }
    }

    pub fn servers(&self) -> &[ServerDescriptor] {
        &self.servers
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// 每次呼叫都重新洗牌
    pub fn shuffled(&self) -> Vec<ServerDescriptor> {
        self.shuffled_with(&mut rand::rng())
    }

    pub fn shuffled_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<ServerDescriptor> {
        shuffle(&self.servers, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn catalog(count: usize) -> ServerCatalog {
        ServerCatalog::new(
            (0..count)
                .map(|i| ServerDescriptor {
                    endpoint: format!("http://server-{}.example.com/start", i),
                    device_type: format!("device-{}", i),
                    access_token: format!("token-{}", i),
                })
                .collect(),
        )
    }

    #[test]
    fn test_shuffled_is_a_permutation() {
        let catalog = catalog(5);
        for _ in 0..20 {
            let shuffled = catalog.shuffled();
            assert_eq!(shuffled.len(), 5);
            let unique: HashSet<_> = shuffled.iter().map(|s| s.device_type.clone()).collect();
            assert_eq!(unique.len(), 5);
        }
    }

    #[test]
    fn test_shuffled_does_not_touch_catalog() {
        let catalog = catalog(4);
        let before = catalog.clone();
        let mut rng = StdRng::seed_from_u64(7);
        let _ = catalog.shuffled_with(&mut rng);
        let _ = catalog.shuffled_with(&mut rng);
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_every_server_can_come_first() {
        let catalog = catalog(3);
        let mut rng = StdRng::seed_from_u64(42);
        let mut firsts = HashSet::new();
        for _ in 0..200 {
            firsts.insert(catalog.shuffled_with(&mut rng)[0].device_type.clone());
        }
        assert_eq!(firsts.len(), 3);
    }

    #[test]
    fn test_shuffle_empty_and_single() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty: Vec<u8> = Vec::new();
        assert!(shuffle(&empty, &mut rng).is_empty());
        assert_eq!(shuffle(&[9u8], &mut rng), vec![9]);
    }
}
