// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table avec SeaORM
//   (PostgreSQL en production, SQLite pour les tests).
//
// Liste des modules:
//   - role : Rôles (Admin, Membre, Partenaire, ...)
//   - membership : Adhésions
//   - event : Événements et leur capacité
//   - event_registration : Inscriptions aux événements
//   - donation : Dons encaissés
//   - pending_donation : Formulaires de don en attente du retour HelloAsso
//   - news : Actualités
//   - message : Messages du formulaire de contact
//   - users : Comptes administrateurs
//   - resource : Matériel de l'association
//   - document : Documents de l'association
//   - dto : Formulaires et requêtes JSON reçus
//
// Points d'attention:
//   - Tous les modèles utilisent SeaORM (pas de SQL brut)
//   - Les relations entre tables sont définies dans chaque modèle
//   - Le nombre de places restantes n'est jamais stocké (calculé)
//
// ============================================================================

pub mod role;
pub mod membership;
pub mod event;
pub mod event_registration;
pub mod donation;
pub mod pending_donation;
pub mod news;
pub mod message;
pub mod users;
pub mod resource;
pub mod document;
pub mod dto;
